use super::{NarrativeContext, NarrativeProvider};
use crate::engine::Severity;
use crate::error::NarrativeError;
use async_trait::async_trait;

/// Deterministic narrator. Never fails, so it doubles as the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn render(context: &NarrativeContext) -> String {
        let mut sentences = Vec::new();

        match &context.primary_carrier {
            Some(carrier) => sentences.push(format!(
                "{} is carrying {}% of the group's load ({:.1} units), a {} imbalance.",
                carrier.name, carrier.percentage_of_family, carrier.total, context.severity
            )),
            None => sentences.push("No one in the group is carrying measurable load yet.".to_string()),
        }

        if let Some(action) = &context.top_action {
            sentences.push(format!("The most impactful first step is to {}.", action));
        }

        if context.severity == Severity::Severe {
            sentences.push(
                "Making invisible work visible and sharing planning will ease the pressure fastest."
                    .to_string(),
            );
        }

        sentences.push(
            "Shared systems that spread information automatically keep the load balanced over time."
                .to_string(),
        );

        sentences.join(" ")
    }
}

#[async_trait]
impl NarrativeProvider for TemplateNarrator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn summarize(&self, context: &NarrativeContext) -> Result<String, NarrativeError> {
        Ok(Self::render(context))
    }
}
