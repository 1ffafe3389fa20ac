//! Instruction text sent alongside the file parts

use gleaner_domain::FieldSpec;

/// Builds the natural-language instruction for one extraction
pub struct PromptBuilder<'a> {
    file_names: Vec<&'a str>,
    fields: &'a [FieldSpec],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(file_names: impl IntoIterator<Item = &'a str>, fields: &'a [FieldSpec]) -> Self {
        Self {
            file_names: file_names.into_iter().collect(),
            fields,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Files provided: {}\n\n", self.file_names.join(", ")));

        prompt.push_str("Fields to extract:\n");
        for field in self.fields {
            let description = if field.description.is_empty() {
                "Extract value"
            } else {
                field.description.as_str()
            };
            prompt.push_str(&format!(
                "- {} ({}): {}\n",
                field.name, field.field_type, description
            ));
        }
        prompt.push('\n');

        prompt.push_str(EXTRACTION_RULES);

        prompt
    }
}

const TASK_INSTRUCTIONS: &str = r#"You are an expert data analyst and extraction AI.

TASK:
Analyze ALL the provided files collectively (documents, images, audio) as a single context.
Aggregate the information found across these different sources to populate the requested data fields.

For every single field, you MUST provide:
1. The extracted 'value'.
2. The 'source' - strictly the name of the file where this specific piece of data was found. If derived from multiple, list them."#;

const EXTRACTION_RULES: &str = r#"Rules:
1. If a field is not found in ANY of the files, set 'value' to null and 'source' to null.
2. For 'date' types, strictly use YYYY-MM-DD format.
3. For 'number' types, remove currency symbols and return raw numbers.
4. Be precise. If the file is an audio file, listen to the content to extract data."#;
