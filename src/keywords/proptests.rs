//! Property-based tests for keyword assembly

use super::*;
use proptest::prelude::*;
use rand::SeedableRng;

fn arb_field() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}".prop_map(String::from)
}

fn arb_request() -> impl Strategy<Value = KeywordRequest> {
    (arb_field(), arb_field(), arb_field())
        .prop_map(|(i, o, l)| KeywordRequest::new(&i, &o, &l).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Without trends the result is exactly the eight templates
    #[test]
    fn prop_no_trends_means_templates(request in arb_request(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let keywords = assemble_keywords(&request, &[], &mut rng);

        prop_assert_eq!(keywords.len(), TEMPLATE_KEYWORD_COUNT);
        prop_assert_eq!(keywords, template_keywords(&request));
    }

    // Trends are appended in order, then min(3, |T|) sampled positions of T
    #[test]
    fn prop_trends_then_samples(
        request in arb_request(),
        trends in proptest::collection::vec("[a-z ]{1,12}", 0..10),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let keywords = assemble_keywords(&request, &trends, &mut rng);
        let expected_samples = trends.len().min(BONUS_SAMPLE_SIZE);

        prop_assert_eq!(keywords.len(), TEMPLATE_KEYWORD_COUNT + trends.len() + expected_samples);
        let templates = template_keywords(&request);
        prop_assert_eq!(&keywords[..TEMPLATE_KEYWORD_COUNT], templates.as_slice());

        let appended_end = TEMPLATE_KEYWORD_COUNT + trends.len();
        prop_assert_eq!(&keywords[TEMPLATE_KEYWORD_COUNT..appended_end], trends.as_slice());

        // Sampling without replacement: no sampled value occurs more often
        // than it does in the trend pool
        for sampled in &keywords[appended_end..] {
            let in_pool = trends.iter().filter(|t| *t == sampled).count();
            let in_sample = keywords[appended_end..].iter().filter(|k| *k == sampled).count();
            prop_assert!(in_pool >= 1);
            prop_assert!(in_sample <= in_pool);
        }
    }

    // Any blank field is rejected regardless of the others
    #[test]
    fn prop_blank_field_rejected(
        fields in (arb_field(), arb_field(), arb_field()),
        blank_index in 0usize..3,
        blank in "[ \t]{0,3}",
    ) {
        let mut values = [fields.0, fields.1, fields.2];
        values[blank_index] = blank;
        let result = KeywordRequest::new(&values[0], &values[1], &values[2]);
        prop_assert!(matches!(result, Err(KeywordError::MissingField(_))));
    }
}
