use crate::domain::{truncate_chars, word_set};
use std::collections::HashSet;

const MIN_ABOUT_WORDS: usize = 10;
const DUPLICATE_OVERLAP: f64 = 0.7;
const CALL_TO_ACTION_MARKERS: &[&str] = &[
    "read more",
    "learn more",
    "contact",
    "click here",
    "view all",
];

/// Joins per-page about texts, skipping pages whose words mostly repeat an earlier page.
///
/// Overlap is measured against the candidate's own word set, so a short page that
/// quotes a long one is dropped while a long page extending a short one is kept.
/// Texts of ten words or fewer are ignored.
pub fn merge_about_texts(page_texts: &[String], limit: usize) -> String {
    let mut accepted: Vec<&str> = Vec::new();
    let mut seen: Vec<HashSet<String>> = Vec::new();

    for text in page_texts {
        if text.split_whitespace().count() <= MIN_ABOUT_WORDS {
            continue;
        }

        let words = word_set(text);
        let repeats_earlier = seen.iter().any(|earlier| {
            let shared = words.intersection(earlier).count();
            shared as f64 / words.len() as f64 > DUPLICATE_OVERLAP
        });

        if repeats_earlier {
            tracing::debug!("Dropping about text that repeats an earlier page");
            continue;
        }

        accepted.push(text);
        seen.push(words);
    }

    truncate_chars(&accepted.join(" "), limit)
}

/// Drops call-to-action snippets and case-insensitive repeats, keeping first-seen order.
pub fn merge_services<I>(services: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    services
        .into_iter()
        .filter(|service| {
            let lower = service.to_lowercase();
            !CALL_TO_ACTION_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .filter(|service| seen.insert(service.to_lowercase()))
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = "Founded in 1987 by two brothers, Acme Plumbing grew from a single van into the most trusted plumbing team in central Ohio.";

    #[test]
    fn test_repeated_about_text_kept_once() {
        let reworded = format!("{} Call today.", STORY);
        let merged = merge_about_texts(&[STORY.to_string(), reworded], 1200);
        assert_eq!(merged, STORY);
    }

    #[test]
    fn test_distinct_about_texts_are_joined() {
        let other = "Our licensed technicians handle emergency repairs, water heaters, sewer lines and full bathroom remodels every day of the week.";
        let merged = merge_about_texts(&[STORY.to_string(), other.to_string()], 1200);
        assert_eq!(merged, format!("{} {}", STORY, other));
    }

    #[test]
    fn test_short_texts_ignored_and_limit_applied() {
        let merged = merge_about_texts(&["only a few words here".to_string(), STORY.to_string()], 20);
        assert_eq!(merged, "Founded in 1987 by t");
    }

    #[test]
    fn test_services_filter_dedupe_and_cap() {
        let services = vec![
            "Drain Cleaning Service".to_string(),
            "Learn more about our plans".to_string(),
            "drain cleaning service".to_string(),
            "Contact us for a quote".to_string(),
            "Water Heater Repair".to_string(),
        ];
        assert_eq!(
            merge_services(services.clone(), 15),
            vec!["Drain Cleaning Service", "Water Heater Repair"]
        );
        assert_eq!(merge_services(services, 1), vec!["Drain Cleaning Service"]);
    }
}
