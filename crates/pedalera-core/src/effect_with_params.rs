//! Combined `Effect` + `ParameterInfo` trait for boxed effects.
//!
//! `Box<dyn Effect>` erases the concrete type, which also erases its
//! [`ParameterInfo`] implementation. [`EffectWithParams`] carries both
//! capabilities through a single vtable via prefixed methods, and a
//! blanket impl covers every concrete type implementing the two traits.
//! The processing graph stores units as `Box<dyn EffectWithParams + Send>`
//! so parameter updates can reach a unit after its type is gone.

use crate::effect::Effect;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Parameter access for type-erased effects.
pub trait EffectWithParams: Effect {
    /// Number of parameters the underlying effect exposes.
    fn effect_param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`.
    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`.
    fn effect_get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index` (clamped by the implementation).
    fn effect_set_param(&mut self, index: usize, value: f32);

    /// Resolves a parameter index from a full or short name,
    /// case-insensitively.
    fn effect_find_param(&self, name: &str) -> Option<usize>;
}

impl<T: Effect + ParameterInfo> EffectWithParams for T {
    fn effect_param_count(&self) -> usize {
        self.param_count()
    }

    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn effect_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn effect_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value);
    }

    fn effect_find_param(&self, name: &str) -> Option<usize> {
        self.find_param_by_name(name)
    }
}
