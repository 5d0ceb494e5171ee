//! Explain command handler

use mindmap_explorer::config::Config;
use mindmap_explorer::core::ai::{fetch_node_details, ContentGenerator, GeminiClient, NodeDetails};
use mindmap_explorer::{error, info};

/// Fetch and print the AI explanation of a node.
pub fn run(name: &str, config: &Config) -> Result<(), String> {
    let client = client(config)?;
    print!("{}", describe(&client, name)?);
    Ok(())
}

/// Gemini client from the configured key
pub fn client(config: &Config) -> Result<GeminiClient, String> {
    GeminiClient::new(&config.ai_config()).map_err(|e| {
        format!("✗ {e} (set it with `mindmap config set api_key KEY` or GEMINI_API_KEY)")
    })
}

/// Look up a node's details and render them as text
pub fn describe<G: ContentGenerator + ?Sized>(
    generator: &G,
    name: &str,
) -> Result<String, String> {
    info!("Requesting details for '{}'", name.trim());
    let details = fetch_node_details(generator, name).map_err(|e| {
        error!("Detail lookup failed for '{}': {e}", name.trim());
        format!("✗ Failed to explain '{}': {e}", name.trim())
    })?;
    Ok(format_details(name.trim(), &details))
}

/// Plain-text rendering of node details
fn format_details(name: &str, details: &NodeDetails) -> String {
    let mut out = format!("\n=== {name} ===\n\n{}\n\n", details.summary);
    out.push_str(&format!("Use case\n  {}\n\n", details.use_case));
    out.push_str("Example\n");
    for line in details.code_example.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("\nTips\n");
    for (i, tip) in details.tips.iter().enumerate() {
        out.push_str(&format!("  {}. {tip}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_explorer::core::ai::AiError;
    use serde_json::{json, Value};

    struct CannedDetails;

    impl ContentGenerator for CannedDetails {
        fn generate_json(&self, prompt: &str, _schema: &Value) -> Result<Value, AiError> {
            assert!(prompt.contains("@Bean"));
            Ok(json!({
                "summary": "Declares a bean.",
                "useCase": "Third-party objects",
                "codeExample": "@Bean\nDataSource ds() {}",
                "tips": ["Name it"]
            }))
        }
    }

    #[test]
    fn test_describe_formats_generated_details() {
        let text = describe(&CannedDetails, " @Bean ").unwrap();
        assert!(text.starts_with("\n=== @Bean ==="));
        assert!(text.contains("Declares a bean."));
        assert!(text.contains("  1. Name it\n"));
    }

    #[test]
    fn test_format_details() {
        let details = NodeDetails {
            summary: "Marks a REST controller.".to_string(),
            use_case: "JSON APIs".to_string(),
            code_example: "@RestController\nclass A {}".to_string(),
            tips: vec!["Keep it thin".to_string(), "Return DTOs".to_string()],
        };
        let text = format_details("@RestController", &details);
        assert!(text.contains("=== @RestController ==="));
        assert!(text.contains("  class A {}\n"));
        assert!(text.contains("  2. Return DTOs\n"));
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = run("@Bean", &mindmap_explorer::config::Config::default()).unwrap_err();
        assert!(err.starts_with('✗'));
    }
}
