pub mod config;
pub mod error;
pub mod flowchart;
pub mod types;

pub use config::{AppConfig, ServerConfig};
pub use error::{Error, Result};
pub use flowchart::{Flowchart, FlowchartEdge, FlowchartNode, NodeKind, Position, NODE_SPACING_Y};
pub use types::{Clause, Message, MessageRole, RiskLevel, StoredDocument};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "hello");

        let assistant = Message::assistant("hi there");
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert_ne!(user.id, assistant.id);
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn test_risk_level_from_str() {
        assert_eq!(RiskLevel::from_str("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_str("Medium"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::from_str("LOW"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_str("unknown"), None);
    }

    #[test]
    fn test_node_kind_serde_rename() {
        let node = FlowchartNode {
            id: "node-0".to_string(),
            label: "Upload Contract".to_string(),
            kind: NodeKind::Start,
            position: Position::for_index(0),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "start");
        assert_eq!(json["position"]["y"], 0.0);
    }

    #[test]
    fn test_position_for_index() {
        assert_eq!(Position::for_index(3).y, 360.0);
        assert_eq!(Position::for_index(3).x, 0.0);
    }

    #[test]
    fn test_flowchart_validate_duplicate_id() {
        let node = |id: &str| FlowchartNode {
            id: id.to_string(),
            label: "x".to_string(),
            kind: NodeKind::Process,
            position: Position::for_index(0),
        };
        let chart = Flowchart {
            nodes: vec![node("node-0"), node("node-0")],
            edges: vec![],
            description: String::new(),
        };
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_flowchart_validate_dangling_edge() {
        let chart = Flowchart {
            nodes: vec![FlowchartNode {
                id: "node-0".to_string(),
                label: "x".to_string(),
                kind: NodeKind::Start,
                position: Position::for_index(0),
            }],
            edges: vec![FlowchartEdge {
                source: "node-0".to_string(),
                target: "node-1".to_string(),
                label: "Next".to_string(),
            }],
            description: String::new(),
        };
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_node_colors() {
        assert_eq!(flowchart::node_color(NodeKind::Start), "#10b981");
        assert_eq!(flowchart::node_color(NodeKind::End), "#ef4444");
        assert_eq!(flowchart::node_color(NodeKind::Decision), "#f59e0b");
        assert_eq!(flowchart::node_color(NodeKind::Process), "#3b82f6");
    }

    #[test]
    fn test_high_risk_detection() {
        let doc = StoredDocument::new(
            "summary",
            vec![
                Clause::new("Termination", "either party may terminate"),
                Clause::new("Liability", "unlimited liability").with_risk(RiskLevel::High),
            ],
        );
        assert!(doc.has_high_risk_clause());

        let doc = StoredDocument::new("summary", vec![Clause::new("Term", "12 months")]);
        assert!(!doc.has_high_risk_clause());
    }

    #[test]
    fn test_app_config_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut bad = AppConfig::default();
        bad.server.port = 0;
        assert!(bad.validate().is_err());
    }
}
