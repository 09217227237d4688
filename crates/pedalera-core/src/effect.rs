//! The processing trait every effect implements.
//!
//! [`Effect`] is deliberately object-safe: the processing graph stores
//! units as `Box<dyn Effect + Send>` and rewires them at runtime. All
//! methods must be real-time safe - no allocation, locking, or I/O.

/// Core trait for all audio effects.
///
/// Mono in, mono out, one sample at a time, with block variants that
/// default to the per-sample path. Implementations with internal state
/// (delay lines, filter history) advance it on every call.
///
/// # Example
///
/// ```rust
/// use pedalera_core::Effect;
///
/// struct Inverter;
///
/// impl Effect for Inverter {
///     fn process(&mut self, input: f32) -> f32 {
///         -input
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut fx = Inverter;
/// assert_eq!(fx.process(0.25), -0.25);
/// ```
pub trait Effect {
    /// Process a single sample.
    ///
    /// Input is nominally in `[-1.0, 1.0]`; implementations must stay
    /// well-behaved (finite output) outside that range.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Must produce output identical (within float tolerance) to calling
    /// [`process`](Self::process) per sample. The default does exactly
    /// that; implementations may override for efficiency but not for
    /// different semantics.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Implementations recalculate anything rate-dependent: filter
    /// coefficients, delay times in samples, LFO increments.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay contents, filter history, envelopes)
    /// without touching parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Accumulator {
        state: f32,
    }

    impl Effect for Accumulator {
        fn process(&mut self, input: f32) -> f32 {
            self.state += input;
            self.state
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {
            self.state = 0.0;
        }
    }

    #[test]
    fn test_default_block_matches_per_sample() {
        let mut a = Accumulator { state: 0.0 };
        let mut b = Accumulator { state: 0.0 };

        let input = [0.1, 0.2, 0.3, 0.4];
        let mut block_out = [0.0; 4];
        a.process_block(&input, &mut block_out);

        for (i, &x) in input.iter().enumerate() {
            let y = b.process(x);
            assert!((block_out[i] - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_inplace_matches_block() {
        let mut a = Accumulator { state: 0.0 };
        let mut b = Accumulator { state: 0.0 };

        let input = [0.5, -0.5, 1.0];
        let mut out = [0.0; 3];
        a.process_block(&input, &mut out);

        let mut buffer = input;
        b.process_block_inplace(&mut buffer);

        assert_eq!(out, buffer);
    }

    #[test]
    fn test_reset_restores_initial_behavior() {
        let mut fx = Accumulator { state: 0.0 };
        fx.process(1.0);
        fx.reset();
        assert_eq!(fx.process(0.0), 0.0);
    }
}
