//! Flowchart generation from a document's clause list.
//!
//! With a chat provider configured, the generator asks for a structured
//! JSON flowchart and parses the first JSON object out of the reply. Any
//! call or parse failure falls back to a fixed linear pipeline chart, so
//! generation never fails outright.

use crate::config::{ChatMessage, ChatRequest};
use crate::error::{LlmError, Result};
use crate::providers::ChatProvider;
use pactum_core::flowchart::{Flowchart, FlowchartEdge, FlowchartNode, NodeKind, Position};
use pactum_core::types::{Clause, RiskLevel};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a legal contract analysis expert. Generate a flowchart \
structure that shows the decision tree and key processes in a contract. Return ONLY valid JSON.";

/// Node sequence of the fallback chart.
const FALLBACK_SEQUENCE: &[(&str, NodeKind)] = &[
    ("Upload Contract", NodeKind::Start),
    ("Extract Clauses", NodeKind::Process),
    ("Analyze with AI", NodeKind::Process),
    ("Identify Risks", NodeKind::Decision),
    ("Generate Summary", NodeKind::Process),
    ("Save Results", NodeKind::Process),
    ("Review Complete", NodeKind::End),
];

#[derive(Debug, Deserialize)]
struct AiFlowchart {
    nodes: Vec<AiNode>,
    #[serde(default)]
    edges: Vec<AiEdge>,
    #[serde(rename = "riskAssessment")]
    risk_assessment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AiNode {
    id: String,
    label: String,
    #[serde(rename = "type")]
    kind: NodeKind,
}

#[derive(Debug, Deserialize)]
struct AiEdge {
    source: String,
    target: String,
    #[serde(default)]
    label: String,
}

pub struct FlowchartGenerator {
    provider: Option<Arc<dyn ChatProvider>>,
    model: Option<String>,
}

impl FlowchartGenerator {
    pub fn new(provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Generates a flowchart for the document. Never fails: any provider
    /// or parse problem resolves to the fixed fallback chart.
    pub async fn generate(&self, summary: &str, clauses: &[Clause]) -> Flowchart {
        match &self.provider {
            Some(provider) if provider.has_api_key() => {
                match self.generate_with_ai(provider.as_ref(), summary, clauses).await {
                    Ok(chart) => chart,
                    Err(e) => {
                        warn!("AI flowchart generation failed: {}, using fallback", e);
                        fallback_flowchart(clauses)
                    }
                }
            }
            _ => {
                debug!("No chat provider configured, using fallback flowchart");
                fallback_flowchart(clauses)
            }
        }
    }

    async fn generate_with_ai(
        &self,
        provider: &dyn ChatProvider,
        summary: &str,
        clauses: &[Clause],
    ) -> Result<Flowchart> {
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(summary, clauses)),
        ]);
        request.model = self.model.clone();
        request.temperature = Some(0.7);
        request.max_tokens = Some(2000);

        let response = provider.chat(request).await?;

        let payload = extract_json(&response.content).ok_or_else(|| {
            LlmError::InvalidResponse("Could not parse JSON from provider response".to_string())
        })?;
        let parsed: AiFlowchart = serde_json::from_str(payload)?;

        if parsed.nodes.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Flowchart payload has no nodes".to_string(),
            ));
        }

        let nodes = parsed
            .nodes
            .into_iter()
            .enumerate()
            .map(|(idx, node)| FlowchartNode {
                id: node.id,
                label: node.label,
                kind: node.kind,
                position: Position::for_index(idx),
            })
            .collect::<Vec<_>>();

        let edges = parsed
            .edges
            .into_iter()
            .map(|edge| FlowchartEdge {
                source: edge.source,
                target: edge.target,
                label: edge.label,
            })
            .collect::<Vec<_>>();

        let risk = parsed
            .risk_assessment
            .as_deref()
            .and_then(RiskLevel::from_str);

        let chart = Flowchart {
            nodes,
            edges,
            description: format!(
                "AI-generated flowchart analysis of {} contract clauses. Risk Level: {}",
                clauses.len(),
                risk.map(|r| r.as_str()).unwrap_or("Unknown"),
            ),
        };

        chart
            .validate()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(chart)
    }
}

fn build_prompt(summary: &str, clauses: &[Clause]) -> String {
    let clauses_list = clauses
        .iter()
        .enumerate()
        .map(|(idx, c)| format!("{}. {}: {}", idx + 1, c.title, c.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze this contract and generate a flowchart in JSON format with this structure:
{{
  "nodes": [
    {{ "id": "node-0", "label": "string", "type": "start|process|decision|end", "description": "string" }}
  ],
  "edges": [
    {{ "source": "node-0", "target": "node-1", "label": "condition or action" }}
  ],
  "riskAssessment": "high|medium|low"
}}

Contract Summary: {}

Key Clauses:
{}

Generate a flowchart showing:
1. Start node
2. Key decision points in the contract
3. Main obligations and processes
4. Risk assessment checkpoints
5. End node with completion status"#,
        summary, clauses_list
    )
}

/// Extracts the first JSON object from free-form response text: everything
/// from the first '{' through the last '}'.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// The fixed 7-node linear pipeline used when no AI collaborator is
/// available or its output cannot be used.
pub fn fallback_flowchart(clauses: &[Clause]) -> Flowchart {
    let nodes = FALLBACK_SEQUENCE
        .iter()
        .enumerate()
        .map(|(idx, (label, kind))| FlowchartNode {
            id: format!("node-{}", idx),
            label: label.to_string(),
            kind: *kind,
            position: Position::for_index(idx),
        })
        .collect::<Vec<_>>();

    let edges = nodes
        .windows(2)
        .map(|pair| FlowchartEdge {
            source: pair[0].id.clone(),
            target: pair[1].id.clone(),
            label: "Next".to_string(),
        })
        .collect();

    let risk_note = if clauses
        .iter()
        .any(|c| c.risk_level == Some(RiskLevel::High))
    {
        "High-risk clauses identified."
    } else {
        "All clauses at acceptable risk levels."
    };

    Flowchart {
        nodes,
        edges,
        description: format!(
            "Fallback flowchart showing contract analysis pipeline. Extracted {} clauses. {}",
            clauses.len(),
            risk_note
        ),
    }
}
