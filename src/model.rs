//! Sequence model interface and the candle LSTM implementation.
//!
//! The generator needs exactly one operation from a model: map a one-hot
//! encoded context window to a probability distribution over the vocabulary.
//! [`SequenceModel`] is that seam; [`MelodyLstm`] is the shipped
//! implementation (one-hot → LSTM → dense → softmax), loading safetensors
//! weights produced by an external training run.
//!
//! # Weight layout
//!
//! ```text
//! lstm.weight_ih_l0   [4*hidden, vocab]
//! lstm.weight_hh_l0   [4*hidden, hidden]
//! lstm.bias_ih_l0     [4*hidden]
//! lstm.bias_hh_l0     [4*hidden]
//! dense.weight        [vocab, hidden]
//! dense.bias          [vocab]
//! ```

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, RNN};

use crate::config::LstmConfig;
use crate::{Error, Result};

/// Next-token predictor over a fixed context window.
///
/// Implementations are loaded once and treated as immutable thereafter;
/// `predict` takes `&mut self` only so stateful models can live behind the
/// same seam.
pub trait SequenceModel {
    /// Vocabulary size the model was trained with.
    fn vocab_size(&self) -> usize;

    /// Probability distribution over the vocabulary for the token following
    /// `context`, a `(1, window, vocab_size)` one-hot f32 tensor.
    ///
    /// The returned vector has `vocab_size` entries and sums to 1 within
    /// floating-point tolerance.
    fn predict(&mut self, context: &Tensor) -> Result<Vec<f32>>;
}

/// One-hot encode a code sequence as a `(len, vocab_size)` f32 tensor.
pub fn one_hot(codes: &[u32], vocab_size: usize, device: &Device) -> Result<Tensor> {
    let mut data = vec![0f32; codes.len() * vocab_size];
    for (i, &code) in codes.iter().enumerate() {
        if code as usize >= vocab_size {
            return Err(Error::Vocab(format!(
                "code {code} out of range for vocabulary size {vocab_size}"
            )));
        }
        data[i * vocab_size + code as usize] = 1.0;
    }
    Ok(Tensor::from_vec(data, (codes.len(), vocab_size), device)?)
}

/// Single-layer LSTM melody model.
pub struct MelodyLstm {
    lstm: candle_nn::LSTM,
    dense: candle_nn::Linear,
    vocab_size: usize,
}

impl MelodyLstm {
    /// Load from a pre-trained safetensors file.
    pub fn load(
        weights_path: &std::path::Path,
        config: &LstmConfig,
        vocab_size: usize,
        device: &Device,
    ) -> Result<Self> {
        tracing::info!("loading melody LSTM weights from {:?}", weights_path);
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
                .map_err(|e| Error::WeightLoad(format!("melody LSTM weights: {e}")))?
        };
        let model = Self::new(config, vocab_size, vb)?;
        tracing::info!("melody LSTM loaded ({} hidden units)", config.hidden_size);
        Ok(model)
    }

    /// Build from a [`VarBuilder`] (weights or zero-init for tests).
    pub fn new(config: &LstmConfig, vocab_size: usize, vb: VarBuilder) -> Result<Self> {
        if vocab_size == 0 {
            return Err(Error::Config("vocabulary size must be > 0".into()));
        }
        let lstm = candle_nn::lstm(
            vocab_size,
            config.hidden_size,
            candle_nn::LSTMConfig::default(),
            vb.pp("lstm"),
        )?;
        let dense = candle_nn::linear(config.hidden_size, vocab_size, vb.pp("dense"))?;
        Ok(Self {
            lstm,
            dense,
            vocab_size,
        })
    }
}

impl SequenceModel for MelodyLstm {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn predict(&mut self, context: &Tensor) -> Result<Vec<f32>> {
        let states = self.lstm.seq(context)?;
        let last = states
            .last()
            .ok_or_else(|| Error::Model("empty context window".into()))?;
        let logits = last.h().apply(&self.dense)?; // [1, vocab]
        let probabilities = candle_nn::ops::softmax_last_dim(&logits)?;
        Ok(probabilities.squeeze(0)?.to_vec1::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_content() {
        let t = one_hot(&[0, 2], 3, &Device::Cpu).unwrap();
        assert_eq!(
            t.to_vec2::<f32>().unwrap(),
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_one_hot_rejects_out_of_range_code() {
        assert!(one_hot(&[3], 3, &Device::Cpu).is_err());
    }

    #[test]
    fn test_zero_weight_lstm_predicts_uniform() {
        let dev = Device::Cpu;
        let config = LstmConfig { hidden_size: 8 };
        let vb = VarBuilder::zeros(DType::F32, &dev);
        let mut model = MelodyLstm::new(&config, 5, vb).unwrap();

        let context = one_hot(&[0, 1, 2, 3], 5, &dev).unwrap().unsqueeze(0).unwrap();
        let probabilities = model.predict(&context).unwrap();
        assert_eq!(probabilities.len(), 5);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum = {sum}");
        for p in probabilities {
            assert!((p - 0.2).abs() < 1e-5, "p = {p}");
        }
    }

    #[test]
    fn test_rejects_empty_vocabulary() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        assert!(MelodyLstm::new(&LstmConfig::default(), 0, vb).is_err());
    }
}
