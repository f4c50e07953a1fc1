use ndarray::{Array2, ArrayView1, Axis};

/// Token-id to feature-vector lookup, shared read-only across sessions.
pub struct EmbeddingTable {
    weights: Array2<f32>,
}

impl EmbeddingTable {
    pub fn new(weights: Array2<f32>) -> Self {
        Self {
            weights,
        }
    }

    pub fn vocab_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn hidden_size(&self) -> usize {
        self.weights.shape()[1]
    }

    pub fn row(
        &self,
        token_id: u64,
    ) -> ArrayView1<'_, f32> {
        assert!(
            (token_id as usize) < self.vocab_size(),
            "token id {} outside vocabulary of size {}",
            token_id,
            self.vocab_size()
        );
        self.weights.row(token_id as usize)
    }

    pub fn lookup(
        &self,
        token_ids: &[u64],
    ) -> Array2<f32> {
        let mut result =
            Array2::<f32>::zeros((token_ids.len(), self.hidden_size()));
        for (mut row, &token_id) in
            result.axis_iter_mut(Axis(0)).zip(token_ids)
        {
            row.assign(&self.row(token_id));
        }
        result
    }
}
