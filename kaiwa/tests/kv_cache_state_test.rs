use kaiwa::forward_pass::KVCache;
use ndarray::Array2;

fn rows(
    count: usize,
    kv_dim: usize,
    value: f32,
) -> Array2<f32> {
    Array2::from_elem((count, kv_dim), value)
}

#[test]
fn block_writes_advance_the_cursor_once() {
    let mut cache = KVCache::new(2, 16, 4);
    assert_eq!(cache.length(), 0);
    assert_eq!(cache.remaining(), 16);

    let keys = rows(3, 4, 1.0);
    let values = rows(3, 4, 2.0);
    for layer_index in 0..cache.num_layers() {
        cache.write_block(layer_index, 0, keys.view(), values.view());
    }
    cache.advance(3);

    assert_eq!(cache.length(), 3);
    let (written_keys, written_values) = cache.written(1);
    assert_eq!(written_keys.shape(), &[3, 4]);
    assert_eq!(written_keys[[2, 0]], 1.0);
    assert_eq!(written_values[[0, 3]], 2.0);

    let (full_keys, _) = cache.full(0);
    assert_eq!(full_keys.shape(), &[16, 4]);
    assert_eq!(full_keys[[3, 0]], 0.0);
}

#[test]
fn written_prefix_grows_with_subsequent_blocks() {
    let mut cache = KVCache::new(1, 8, 2);
    cache.write_block(0, 0, rows(4, 2, 1.0).view(), rows(4, 2, 1.0).view());
    cache.advance(4);
    cache.write_block(0, 4, rows(2, 2, 2.0).view(), rows(2, 2, 2.0).view());
    cache.advance(2);

    let (keys, _) = cache.written(0);
    assert_eq!(keys.shape(), &[6, 2]);
    assert_eq!(keys[[3, 0]], 1.0);
    assert_eq!(keys[[4, 0]], 2.0);
}

#[test]
#[should_panic(expected = "does not continue the written prefix")]
fn gap_write_panics() {
    let mut cache = KVCache::new(1, 8, 2);
    cache.write_block(0, 2, rows(1, 2, 1.0).view(), rows(1, 2, 1.0).view());
}

#[test]
#[should_panic(expected = "does not continue the written prefix")]
fn rewrite_of_written_position_panics() {
    let mut cache = KVCache::new(1, 8, 2);
    cache.write_block(0, 0, rows(2, 2, 1.0).view(), rows(2, 2, 1.0).view());
    cache.advance(2);
    cache.write_block(0, 0, rows(1, 2, 9.0).view(), rows(1, 2, 9.0).view());
}

#[test]
#[should_panic(expected = "exceeds capacity")]
fn write_past_capacity_panics() {
    let mut cache = KVCache::new(1, 4, 2);
    cache.write_block(0, 0, rows(5, 2, 1.0).view(), rows(5, 2, 1.0).view());
}

#[test]
fn reset_rewinds_and_zeroes() {
    let mut cache = KVCache::new(1, 4, 2);
    cache.write_block(0, 0, rows(2, 2, 7.0).view(), rows(2, 2, 7.0).view());
    cache.advance(2);

    cache.reset();
    assert_eq!(cache.length(), 0);
    let (keys, values) = cache.full(0);
    assert!(keys.iter().all(|&value| value == 0.0));
    assert!(values.iter().all(|&value| value == 0.0));
}
