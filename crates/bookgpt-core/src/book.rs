//! Book catalog and chapter content used as prompt context
//!
//! `BookLibrary` is a plain read-only value: build it once at startup and
//! hand it (usually behind an `Arc`) to whatever needs book content.

use serde::{Deserialize, Serialize};

/// Identifier of the mission/vision chapter
pub const MISSION_VISION_CHAPTER: &str = "chapter-2";

/// Identifier of the stakeholder motivation (SMILE) chapter
pub const STAKEHOLDER_CHAPTER: &str = "chapter-3";

/// A selectable book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub description: String,
}

/// A fill-in-the-blanks statement template taken from a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub structure: String,
    pub example: String,
}

/// A chapter whose content is injected into prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub content: String,
    pub key_points: Vec<String>,
    #[serde(default)]
    pub templates: Vec<StatementTemplate>,
}

#[derive(Debug, Clone)]
pub struct BookLibrary {
    source_title: String,
    books: Vec<Book>,
    chapters: Vec<Chapter>,
}

impl BookLibrary {
    /// Empty library whose chapters come from the book named `source_title`
    pub fn new(source_title: impl Into<String>) -> Self {
        Self {
            source_title: source_title.into(),
            books: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// The catalog and chapters shipped with the application
    pub fn builtin() -> Self {
        Self::new("The 7Ms of Digital Transformation")
            .with_book(Book {
                id: 2,
                title: "The 7Ms of Digital Transformation".to_string(),
                author: "Arindam Dutta".to_string(),
                description: "A comprehensive guide to digital transformation through seven \
                              essential methodologies. Learn how to navigate the digital \
                              landscape and transform your business with proven strategies."
                    .to_string(),
            })
            .with_book(Book {
                id: 1,
                title: "The Great Gatsby".to_string(),
                author: "F. Scott Fitzgerald".to_string(),
                description: "A classic American novel set in the Jazz Age, exploring themes \
                              of wealth, love, and the American Dream through the eyes of \
                              narrator Nick Carraway."
                    .to_string(),
            })
            .with_book(Book {
                id: 3,
                title: "Pride and Prejudice".to_string(),
                author: "Jane Austen".to_string(),
                description: "A timeless romance following Elizabeth Bennet and Mr. Darcy as \
                              they navigate social expectations, personal growth, and the \
                              complexities of love in Regency England."
                    .to_string(),
            })
            .with_chapter(mission_vision_chapter())
            .with_chapter(stakeholder_chapter())
    }

    pub fn with_book(mut self, book: Book) -> Self {
        match self.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => self.books.push(book),
        }
        self
    }

    /// Insert a chapter, replacing any chapter with the same id
    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        match self.chapters.iter_mut().find(|c| c.id == chapter.id) {
            Some(existing) => *existing = chapter,
            None => self.chapters.push(chapter),
        }
        self
    }

    pub fn source_title(&self) -> &str {
        &self.source_title
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// Chapter 2 content, key principles and statement templates as prompt text.
    ///
    /// Returns an empty string when the chapter is not loaded.
    pub fn mission_vision_context(&self) -> String {
        let Some(chapter) = self.chapter(MISSION_VISION_CHAPTER) else {
            return String::new();
        };

        let mut context = format!(
            "Based on \"{}\" Chapter 2:\n\n{}\n",
            self.source_title,
            chapter.content.trim()
        );

        if !chapter.key_points.is_empty() {
            context.push_str("\nKey Principles:\n");
            for point in &chapter.key_points {
                context.push_str(&format!("- {}\n", point));
            }
        }

        if !chapter.templates.is_empty() {
            context.push_str("\nTemplates Available:\n");
            let templates: Vec<String> = chapter
                .templates
                .iter()
                .map(|t| format!("{}: {}\nExample: {}", t.kind, t.structure, t.example))
                .collect();
            context.push_str(&templates.join("\n\n"));
            context.push('\n');
        }

        context
    }

    /// Chapter 3 (SMILE framework) content as prompt text
    pub fn stakeholder_context(&self) -> String {
        self.chapter(STAKEHOLDER_CHAPTER)
            .map(|c| format!("{}: {}\n\n{}", self.source_title, c.title, c.content.trim()))
            .unwrap_or_default()
    }
}

impl Default for BookLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn mission_vision_chapter() -> Chapter {
    Chapter {
        id: MISSION_VISION_CHAPTER.to_string(),
        title: "Mission and Vision in Digital Transformation".to_string(),
        content: "\
Mission and Vision statements are foundational elements that guide any successful digital \
transformation initiative. They provide direction, purpose, and alignment across the organization.

A Mission Statement defines the organization's purpose - why it exists and what it aims to \
achieve. In the context of digital transformation, the mission should reflect how technology \
and digital capabilities will enable the organization to fulfill its core purpose more effectively.

A Vision Statement describes the desired future state - what the organization aspires to \
become. For digital transformation, the vision should paint a clear picture of how the \
organization will operate, compete, and create value in the digital age.

Key Elements for Mission Statement:
- Clear purpose and reason for existence
- How digital capabilities enhance core business
- Value proposition to stakeholders
- Cultural values and principles

Key Elements for Vision Statement:
- Future state after transformation
- Digital capabilities and competitive advantages
- Market position and customer experience
- Organizational culture and capabilities

The mission and vision must be:
- Aligned with business strategy
- Inspiring and motivational
- Clear and understandable
- Achievable yet ambitious
- Measurable and specific"
            .to_string(),
        key_points: [
            "Mission defines purpose, Vision defines future state",
            "Must align with overall business strategy",
            "Should reflect digital capabilities and advantages",
            "Need to be inspiring yet achievable",
            "Should guide decision-making throughout transformation",
            "Must consider stakeholder value and organizational culture",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        templates: vec![
            StatementTemplate {
                kind: "mission_template".to_string(),
                structure: "We exist to [purpose] by [how] for [stakeholders] through \
                            [digital capabilities]"
                    .to_string(),
                example: "We exist to transform healthcare delivery by leveraging AI and data \
                          analytics for better patient outcomes through integrated digital \
                          platforms"
                    .to_string(),
            },
            StatementTemplate {
                kind: "vision_template".to_string(),
                structure: "By [timeframe], we will be [future state] recognized for \
                            [differentiation] enabling [value creation]"
                    .to_string(),
                example: "By 2027, we will be the leading digital-first healthcare provider \
                          recognized for personalized patient care enabling improved health \
                          outcomes and reduced costs"
                    .to_string(),
            },
        ],
    }
}

fn stakeholder_chapter() -> Chapter {
    Chapter {
        id: STAKEHOLDER_CHAPTER.to_string(),
        title: "Motivating Key Stakeholders - The SMILE Framework".to_string(),
        content: "\
The SMILE framework provides a systematic approach to stakeholder engagement:

S - SCAN: Identify and map all stakeholders
- Primary stakeholders: Direct impact/influence on transformation
- Secondary stakeholders: Indirect influence but important for success
- Key stakeholders: High influence/high interest individuals
- Shadow stakeholders: Behind-the-scenes influencers

M - MAP: Power-Interest Matrix Analysis
- High Power, High Interest: Manage Closely (Champions, Key Decision Makers)
- High Power, Low Interest: Keep Satisfied (Senior Executives, Board Members)
- Low Power, High Interest: Keep Informed (End Users, Customers)
- Low Power, Low Interest: Monitor (Peripheral teams, Vendors)

I - IDENTIFY: Motivation Factors
- WIIFM (What's In It For Me): Personal benefits and value
- Career advancement opportunities
- Reduced workload or improved efficiency
- Recognition and status enhancement
- Risk mitigation and job security

L - LEVERAGE: Engagement Strategies
- Champions: Amplify their influence, provide resources
- Supporters: Maintain engagement, recognize contributions
- Neutrals: Educate and demonstrate value
- Skeptics: Address concerns, provide evidence
- Blockers: Understand resistance, find compromise

E - EXECUTE: Communication & Action Plans
- Tailored messaging for each stakeholder group
- Regular touchpoints and feedback loops
- Quick wins to build momentum
- Escalation paths for resistance
- Success metrics and tracking

Key Principles:
- Stakeholder motivation is dynamic - regular reassessment needed
- One-size-fits-all approaches fail
- Early engagement prevents later resistance
- Transparency builds trust
- Demonstrable value overcomes skepticism"
            .to_string(),
        key_points: [
            "Map every stakeholder on the power-interest matrix",
            "Motivate through WIIFM factors",
            "Tailor communication to each stakeholder group",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        templates: Vec::new(),
    }
}
