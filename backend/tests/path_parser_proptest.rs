//! Property tests for the request path grammar.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use authoridy::api::DateFilter;
use authoridy::http::{parse, ParseFailure};

const PREFIX: &str = "author";

fn handler_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,11}"
}

fn contributor_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9._~:-]{1,12}", 1..4)
}

fn wire_date() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        (0i64..40_000).prop_map(|days| {
            let date = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + Duration::days(days);
            date.format("%Y%m%d").to_string()
        }),
    ]
}

fn is_wire_date_shape(s: &str) -> bool {
    s == "*" || (s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()))
}

proptest! {
    #[test]
    fn well_formed_urls_parse(
        handler in handler_name(),
        since in wire_date(),
        segments in contributor_segments(),
        page in prop::option::of(1u32..1000),
    ) {
        let contributor = segments.join("/");
        let mut url = format!("/{}/{}/{}/{}", PREFIX, handler, since, contributor);
        if let Some(page) = page {
            url.push_str(&format!("?page={}", page));
        }

        let parsed = parse(&url, PREFIX).unwrap();
        prop_assert_eq!(&parsed.route.handler_name, &handler);
        prop_assert_eq!(&parsed.query.contributor_id, &contributor);
        prop_assert_eq!(parsed.query.since.to_wire(), since);
        prop_assert_eq!(
            parsed.query.param("page").map(str::to_string),
            page.map(|p| p.to_string())
        );
    }

    #[test]
    fn dates_outside_the_grammar_fail(
        handler in handler_name(),
        since in "[0-9*a-z-]{1,10}",
        contributor in "[a-z]{1,8}",
    ) {
        prop_assume!(!is_wire_date_shape(&since));

        let url = format!("/{}/{}/{}/{}", PREFIX, handler, since, contributor);
        let result = parse(&url, PREFIX);
        prop_assert!(matches!(result, Err(ParseFailure::Date(_))), "accepted {}", url);
    }

    #[test]
    fn accepted_dates_match_the_wire_pattern(
        since in "[0-9*]{1,9}",
    ) {
        let url = format!("/{}/demo/{}/jane", PREFIX, since);
        if let Ok(parsed) = parse(&url, PREFIX) {
            prop_assert!(is_wire_date_shape(&since));
            prop_assert_eq!(parsed.query.since == DateFilter::AllTime, since == "*");
        }
    }
}
