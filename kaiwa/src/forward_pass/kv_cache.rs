use ndarray::{Array2, ArrayView2, s};

pub struct KVCacheLayer {
    /// `[capacity, kv_dim]`
    keys: Array2<f32>,
    /// `[capacity, kv_dim]`
    values: Array2<f32>,
}

/// Fixed-capacity per-layer key/value buffers with a single write cursor.
///
/// Positions are written exactly once, in strictly increasing order:
/// every layer writes the same `[start, start + rows)` range for the
/// current block, then `advance` moves the cursor once. A write that
/// would leave a gap or run past capacity is a programming error and
/// panics.
pub struct KVCache {
    layers: Box<[KVCacheLayer]>,
    length: usize,
    capacity: usize,
}

impl KVCache {
    pub fn new(
        num_layers: usize,
        capacity: usize,
        kv_dim: usize,
    ) -> Self {
        let layers: Box<[KVCacheLayer]> = (0..num_layers)
            .map(|_| KVCacheLayer {
                keys: Array2::zeros((capacity, kv_dim)),
                values: Array2::zeros((capacity, kv_dim)),
            })
            .collect();
        Self {
            layers,
            length: 0,
            capacity,
        }
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.length
    }

    /// Views over the written prefix `[0, length)` of one layer.
    pub fn written(
        &self,
        layer_index: usize,
    ) -> (ArrayView2<'_, f32>, ArrayView2<'_, f32>) {
        let layer = &self.layers[layer_index];
        (
            layer.keys.slice(s![..self.length, ..]),
            layer.values.slice(s![..self.length, ..]),
        )
    }

    /// Full-capacity views of one layer, unwritten rows included. Decode
    /// steps pass these together with a bias that masks unwritten rows.
    pub fn full(
        &self,
        layer_index: usize,
    ) -> (ArrayView2<'_, f32>, ArrayView2<'_, f32>) {
        let layer = &self.layers[layer_index];
        (layer.keys.view(), layer.values.view())
    }

    /// Write `keys`/`values` rows at `[start, start + rows)` for one
    /// layer. `start` must equal the current cursor.
    pub fn write_block(
        &mut self,
        layer_index: usize,
        start: usize,
        keys: ArrayView2<'_, f32>,
        values: ArrayView2<'_, f32>,
    ) {
        let rows = keys.shape()[0];
        assert_eq!(
            start, self.length,
            "cache write at {} does not continue the written prefix {}",
            start, self.length
        );
        assert!(
            start + rows <= self.capacity,
            "cache write [{}, {}) exceeds capacity {}",
            start,
            start + rows,
            self.capacity
        );
        assert_eq!(keys.shape(), values.shape());

        let layer = &mut self.layers[layer_index];
        layer.keys.slice_mut(s![start..start + rows, ..]).assign(&keys);
        layer.values.slice_mut(s![start..start + rows, ..]).assign(&values);
    }

    /// Advance the cursor after every layer has written the current
    /// block.
    pub fn advance(
        &mut self,
        rows: usize,
    ) {
        assert!(
            self.length + rows <= self.capacity,
            "cache cursor {} + {} exceeds capacity {}",
            self.length,
            rows,
            self.capacity
        );
        self.length += rows;
    }

    /// Zero all buffers and rewind the cursor. No partial state survives
    /// into the next session.
    pub fn reset(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.keys.fill(0.0);
            layer.values.fill(0.0);
        }
        self.length = 0;
    }
}
