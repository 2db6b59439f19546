use boutique_core::extract;

use super::CommandResult;

pub fn run(text: &str, brands: &[String]) -> CommandResult {
    let extraction = extract(text, brands);
    CommandResult::payload("extract", &extraction)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn emits_filters_and_intent_as_json() {
        let result = run("summer dresses under $100", &[]);
        assert_eq!(result.exit_code, 0);

        let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(value["filters"]["season"], serde_json::json!(["summer"]));
        assert_eq!(value["filters"]["price"]["max"], serde_json::json!(100));
        assert_eq!(value["intent"]["is_event_flow"], serde_json::json!(false));
    }
}
