use serde::Serialize;
use serde_json::{Value, json};

/// A tool as advertised to tool-calling clients
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "log_entry",
            description: "Add a new knowledge entry to the system",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "The content of the entry"
                    },
                    "tags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional tags for categorization"
                    }
                },
                "required": ["content"]
            }),
        },
        ToolDefinition {
            name: "search_entries",
            description: "Search entries by text content and/or tags",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to search for in entry content"
                    },
                    "tags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Filter by tags (entries must have all specified tags)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (default 20)",
                        "default": 20
                    }
                }
            }),
        },
        ToolDefinition {
            name: "create_card",
            description: "Create a new flashcard for spaced repetition",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "card_type": {
                        "type": "string",
                        "enum": ["basic", "reversible", "cloze"],
                        "description": "Type of card: basic (front->back), reversible (both directions), cloze (fill in blank)"
                    },
                    "front": {
                        "type": "string",
                        "description": "Front of the card (question or text with {{cloze}} markers)"
                    },
                    "back": {
                        "type": "string",
                        "description": "Back of the card (answer). Optional for cloze cards."
                    },
                    "entry_id": {
                        "type": "integer",
                        "description": "Optional link to source entry"
                    },
                    "tags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional tags for the card"
                    }
                },
                "required": ["card_type", "front"]
            }),
        },
        ToolDefinition {
            name: "get_due_cards",
            description: "Get cards that are due for review",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of cards to return (default 10)",
                        "default": 10
                    }
                }
            }),
        },
        ToolDefinition {
            name: "record_review",
            description: "Record a review for a card and update its schedule using SM-2 algorithm",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "card_id": {
                        "type": "integer",
                        "description": "ID of the card being reviewed"
                    },
                    "rating": {
                        "type": "integer",
                        "enum": [0, 1, 2, 3],
                        "description": "Rating: 0=again (forgot), 1=hard, 2=good, 3=easy"
                    }
                },
                "required": ["card_id", "rating"]
            }),
        },
        ToolDefinition {
            name: "browse_cards",
            description: "List cards with optional filters for browsing/managing the deck",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Filter by tags"
                    },
                    "card_type": {
                        "type": "string",
                        "enum": ["basic", "reversible", "cloze"],
                        "description": "Filter by card type"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of cards to return (default 20)",
                        "default": 20
                    },
                    "offset": {
                        "type": "integer",
                        "description": "Number of cards to skip for pagination (default 0)",
                        "default": 0
                    }
                }
            }),
        },
        ToolDefinition {
            name: "get_stats",
            description: "Get totals for entries and cards, cards due now, and reviews in the last 7 days",
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}
