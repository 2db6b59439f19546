//! One-decision-per-turn reply planning.
//!
//! Each turn either short-circuits on a reset command, withholds filters
//! while event-flow slots are missing, or applies the merged filters with a
//! deterministic summary. Suggestion chips are assembled the same way every
//! time so the surface can render them without further logic.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::filter::FilterPayload;
use crate::extract::{extract, Extraction};
use crate::merge::merge;

static RESET_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:clear|reset)\s+(?:filters|all)\b").unwrap());

const BASE_CATEGORY_CHIPS: [&str; 5] = ["Dresses", "Tops", "Pants", "Shoes", "Accessories"];
const MAX_QUICK_REPLIES: usize = 8;

/// The planner's decision for one turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplyPlan {
    /// Human-readable assistant message.
    pub message: String,
    /// The merged filter payload after this turn (empty after a reset).
    pub filters: FilterPayload,
    /// False while event-flow slots are still missing; the surface should
    /// hold off applying the filters until clarified.
    pub apply_filters: bool,
    pub meta: ReplyMeta,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyMeta {
    /// Slots still required for the event flow (`season`, `colors`,
    /// `price.max`).
    pub missing: Vec<String>,
    /// Complementary categories for "complete the look" suggestions.
    pub complements: Vec<String>,
    /// Deduplicated suggestion chips, at most eight.
    pub quick_replies: Vec<String>,
    /// True when this turn cleared all filters on user command.
    pub cleared: bool,
}

/// Fixed adjacency of complementary categories, first matching primary
/// category wins.
pub fn complement_categories(primary: &[String]) -> Vec<String> {
    let has = |key: &str| primary.iter().any(|category| category == key);
    let complements: &[&str] = if has("tops") {
        &["pants", "skirts", "accessories"]
    } else if has("dresses") {
        &["shoes", "accessories", "outerwear"]
    } else if has("pants") {
        &["tops", "accessories"]
    } else if has("skirts") {
        &["tops", "accessories"]
    } else if has("shoes") {
        &["accessories"]
    } else {
        &["accessories"]
    };
    complements.iter().map(|category| category.to_string()).collect()
}

fn summarize_filters(filters: &FilterPayload) -> String {
    let mut parts = Vec::new();

    if let Some(categories) = &filters.include_categories {
        parts.push(categories.join(", "));
    }
    if let Some(occasion) = &filters.occasion {
        parts.push(format!("for {}", occasion.join("/")));
    }
    if let Some(season) = &filters.season {
        parts.push(format!("in {}", season.join("/")));
    }
    if let Some(colors) = &filters.colors {
        let shown = colors.iter().take(4).cloned().collect::<Vec<_>>();
        parts.push(format!("colors: {}", shown.join(", ")));
    }
    match (filters.price_min(), filters.price_max()) {
        (Some(min), Some(max)) => parts.push(format!("between ${min}–${max}")),
        (None, Some(max)) => parts.push(format!("under ${max}")),
        (Some(min), None) => parts.push(format!("over ${min}")),
        (None, None) => {}
    }

    if parts.is_empty() {
        "Here are some options you might like.".to_string()
    } else {
        format!("Here are picks {}.", parts.join(" "))
    }
}

fn quick_replies(filters: &FilterPayload, complements: &[String]) -> Vec<String> {
    let mut chips: Vec<String> = Vec::new();

    if filters.price_max().is_none() {
        chips.extend(["Under $50", "Under $100", "Under $150", "Under $200"].map(String::from));
    }
    if filters.season.is_none() {
        chips.extend(["Spring", "Summer", "Fall", "Winter"].map(String::from));
    }
    if filters.colors.is_none() {
        chips.extend(["Black", "Navy", "Beige", "Pastel"].map(String::from));
    }
    if let Some(first) = complements.first() {
        chips.push(format!("Show {first}"));
    }
    if filters.include_categories.is_none() {
        chips.extend(BASE_CATEGORY_CHIPS.map(String::from));
    }

    let mut seen = std::collections::HashSet::new();
    chips.retain(|chip| seen.insert(chip.to_lowercase()));
    chips.truncate(MAX_QUICK_REPLIES);
    chips
}

/// Plan the assistant reply for one turn given the user's text and the
/// previously merged filters.
pub fn plan_reply(user_text: &str, prior: &FilterPayload, known_brands: &[String]) -> ReplyPlan {
    let text = user_text.trim();

    if RESET_COMMAND.is_match(text) {
        return ReplyPlan {
            message: "Okay, I cleared all filters. What are you looking for now?".to_string(),
            filters: FilterPayload::default(),
            apply_filters: true,
            meta: ReplyMeta {
                quick_replies: BASE_CATEGORY_CHIPS.map(String::from).to_vec(),
                cleared: true,
                ..ReplyMeta::default()
            },
        };
    }

    let Extraction { filters: extracted, intent } = extract(text, known_brands);
    let merged = merge(prior, &extracted);

    let mut missing = Vec::new();
    if intent.is_event_flow {
        if merged.season.is_none() {
            missing.push("season".to_string());
        }
        if merged.colors.is_none() {
            missing.push("colors".to_string());
        }
        if merged.price_max().is_none() {
            missing.push("price.max".to_string());
        }
    }

    let (message, apply_filters) = if intent.is_event_flow && !missing.is_empty() {
        let mut questions = Vec::new();
        if merged.season.is_none() {
            questions.push("Is the event in spring, summer, fall, or winter?");
        }
        if merged.colors.is_none() {
            questions.push("Any preferred colors (or colors to avoid)?");
        }
        if merged.price_max().is_none() {
            questions.push("Do you have a maximum budget?");
        }
        (
            format!("Got it—an event look. To tailor picks, a few details: {}", questions.join(" ")),
            false,
        )
    } else {
        (summarize_filters(&merged), true)
    };

    let complements = if let Some(categories) = &merged.include_categories {
        complement_categories(categories)
    } else if intent.wants_outfit {
        vec!["accessories".to_string()]
    } else {
        Vec::new()
    };

    let quick_replies = quick_replies(&merged, &complements);

    ReplyPlan {
        message,
        filters: merged,
        apply_filters,
        meta: ReplyMeta { missing, complements, quick_replies, cleared: false },
    }
}

/// Stateless single-turn convenience: plan a reply with no prior filters.
pub fn plan_single_turn(user_text: &str) -> ReplyPlan {
    plan_reply(user_text, &FilterPayload::default(), &[])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{complement_categories, plan_reply, plan_single_turn};
    use crate::domain::filter::FilterPayload;

    #[test]
    fn reset_command_clears_filters_immediately() {
        let prior = FilterPayload {
            colors: Some(vec!["black".to_string()]),
            ..FilterPayload::default()
        };
        let plan = plan_reply("please clear filters", &prior, &[]);

        assert!(plan.meta.cleared);
        assert!(plan.apply_filters);
        assert!(plan.filters.is_empty());
        assert_eq!(plan.meta.quick_replies.len(), 5);
    }

    #[test]
    fn event_flow_withholds_filters_until_slots_are_filled() {
        let plan = plan_single_turn("wedding guest dress");

        assert_eq!(plan.meta.missing, vec!["season", "colors", "price.max"]);
        assert!(!plan.apply_filters);
        assert!(plan.message.contains("spring, summer, fall, or winter"));
        assert!(plan.message.contains("maximum budget"));

        // Second turn supplies the remaining slots.
        let followup = plan_reply("pastel-pink in summer under $150", &plan.filters, &[]);
        assert!(followup.meta.missing.is_empty());
        assert!(followup.apply_filters);
        assert_eq!(followup.filters.price_max(), Some(150));
        assert!(followup.filters.season.is_some());
        assert!(followup.filters.colors.is_some());
    }

    #[test]
    fn complete_event_request_applies_immediately() {
        let plan = plan_single_turn("wedding dress in summer, pastel-blue, under $200");
        assert!(plan.meta.missing.is_empty());
        assert!(plan.apply_filters);
        assert!(plan.message.starts_with("Here are picks"));
    }

    #[test]
    fn summary_lists_parts_in_fixed_order() {
        let prior = FilterPayload::default();
        let plan = plan_reply("summer dresses under $100", &prior, &[]);
        assert_eq!(plan.message, "Here are picks dresses in summer under $100.");
    }

    #[test]
    fn generic_fallback_when_nothing_extracted() {
        let plan = plan_single_turn("hmm");
        assert_eq!(plan.message, "Here are some options you might like.");
    }

    #[test]
    fn quick_replies_capped_at_eight_without_duplicates() {
        let plan = plan_single_turn("hello");
        assert!(plan.meta.quick_replies.len() <= 8);

        let lowered: HashSet<String> =
            plan.meta.quick_replies.iter().map(|chip| chip.to_lowercase()).collect();
        assert_eq!(lowered.len(), plan.meta.quick_replies.len());
    }

    #[test]
    fn complements_follow_first_hit_priority() {
        assert_eq!(
            complement_categories(&["dresses".to_string(), "tops".to_string()]),
            vec!["pants", "skirts", "accessories"]
        );
        assert_eq!(
            complement_categories(&["outerwear".to_string()]),
            vec!["accessories"]
        );
    }

    #[test]
    fn dress_turn_suggests_complements() {
        let plan = plan_single_turn("show me dresses");
        assert_eq!(plan.meta.complements, vec!["shoes", "accessories", "outerwear"]);
        // Budget/season/color chips fill the cap first, so the complement
        // chip only surfaces once those slots are answered.
        assert_eq!(plan.meta.quick_replies.len(), 8);

        let followup = plan_single_turn("pastel-pink dresses in summer under $100");
        assert_eq!(followup.meta.quick_replies, vec!["Show shoes"]);
    }

    #[test]
    fn outfit_intent_defaults_complements_to_accessories() {
        let plan = plan_single_turn("help me complete the look");
        assert_eq!(plan.meta.complements, vec!["accessories"]);
    }
}
