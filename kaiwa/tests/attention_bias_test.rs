use kaiwa::forward_pass::{DecodeBias, MASKED, prefill_block_bias};

#[test]
fn first_block_is_causal_over_real_rows() {
    // Prompt of 2 tokens inside a block of 4: rows 2 and 3 are padding.
    let bias = prefill_block_bias(0, 4, 0, 2);
    assert_eq!(bias.shape(), &[4, 4]);

    assert_eq!(bias[[0, 0]], 0.0);
    assert_eq!(bias[[0, 1]], MASKED);
    assert_eq!(bias[[1, 0]], 0.0);
    assert_eq!(bias[[1, 1]], 0.0);
    assert_eq!(bias[[1, 2]], MASKED);

    for j in 0..4 {
        assert_eq!(bias[[2, j]], MASKED);
        assert_eq!(bias[[3, j]], MASKED);
    }
}

#[test]
fn growth_block_sees_the_whole_prior_cache() {
    // Second block: 4 positions already cached, block covers positions
    // 4..8 of a 6-token prompt.
    let bias = prefill_block_bias(4, 4, 4, 6);
    assert_eq!(bias.shape(), &[4, 8]);

    // Row 0 is position 4: prior positions plus itself.
    for j in 0..=4 {
        assert_eq!(bias[[0, j]], 0.0);
    }
    assert_eq!(bias[[0, 5]], MASKED);

    // Row 1 is position 5, the last real one.
    for j in 0..=5 {
        assert_eq!(bias[[1, j]], 0.0);
    }
    assert_eq!(bias[[1, 6]], MASKED);

    // Rows 2 and 3 are padding.
    for j in 0..8 {
        assert_eq!(bias[[2, j]], MASKED);
        assert_eq!(bias[[3, j]], MASKED);
    }
}

#[test]
fn decode_bias_starts_with_prompt_and_current_column_visible() {
    let bias = DecodeBias::new(8, 3);
    let view = bias.as_view();
    assert_eq!(view.shape(), &[1, 9]);

    for position in 0..3 {
        assert!(bias.is_visible(position));
    }
    for position in 3..8 {
        assert!(!bias.is_visible(position));
    }
    // Trailing column for the token currently being processed.
    assert_eq!(view[[0, 8]], 0.0);
}

#[test]
fn marking_visible_is_monotonic() {
    let mut bias = DecodeBias::new(8, 3);
    bias.mark_visible(3);
    assert!(bias.is_visible(3));
    assert!(!bias.is_visible(4));
    bias.mark_visible(4);
    assert!(bias.is_visible(3));
    assert!(bias.is_visible(4));
}
