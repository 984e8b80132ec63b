//! LLM prompt for family extraction

/// Builds prompts for the LLM to extract people and relationships
pub struct PromptBuilder {
    text: String,
    known_people: Vec<String>,
    known_limit: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            known_people: Vec::new(),
            known_limit: usize::MAX,
        }
    }

    /// List people already recorded so the model reuses their names
    pub fn with_known_people(mut self, names: Vec<String>, limit: usize) -> Self {
        self.known_people = names;
        self.known_limit = limit;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instruction and format specification
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Names already on record
        if !self.known_people.is_empty() && self.known_limit > 0 {
            prompt.push_str(
                "People already recorded (use these exact first names when the text refers to them):\n",
            );
            for name in self.known_people.iter().take(self.known_limit) {
                prompt.push_str(&format!("- {}\n", name));
            }
            prompt.push('\n');
        }

        // 3. The text to analyze
        prompt.push_str("Text:\n");
        prompt.push_str(self.text.trim());
        prompt.push_str("\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an information extractor that converts family information from natural language into structured JSON data.

Output JSON format:
{
  "people": [
    { "firstname": "Name", "surname": "", "gender": "Male/Female",
      "birth_year": "", "death_year": "",
      "marriage_year": "" }
  ],
  "relationships": [
    { "type": "spouse", "person1": "Name1", "person2": "Name2" },
    { "type": "parent", "parent": "Name1", "child": "Name2" }
  ]
}

Rules:
- Refer to people in relationships by first name exactly as in "people"
- Record a parent relationship for each parent the text names
- Years are four digits; leave a field empty when the text does not say"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Only return valid JSON, no markdown code blocks, no explanations.";
