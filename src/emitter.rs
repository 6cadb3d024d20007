use crate::Var3;

/// Light source attached to a surface.
#[derive(Debug, Clone)]
pub enum Emitter {
    /// Uniform radiance leaving every point of the surface.
    Area { emission: Var3 },
}

impl Emitter {
    pub fn area(emission: impl Into<Var3>) -> Self {
        Emitter::Area { emission: emission.into() }
    }

    pub fn emission(&self) -> Var3 {
        match self {
            Emitter::Area { emission } => emission.clone(),
        }
    }
}

/// Radiance of an optional emitter; a missing one emits nothing.
pub fn emission(emitter: Option<&Emitter>) -> Var3 {
    emitter.map_or_else(Var3::zeros, Emitter::emission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::VarKind;

    #[test]
    fn test_emission_shares_variable() {
        let e = Var3::variable(vec3!(1, 1, 1));
        let emitter = Emitter::Area { emission: e.clone() };
        let out = emission(Some(&emitter));
        assert!(out.ptr_eq(&e));
        assert_eq!(out.kind(), VarKind::Variable);
    }

    #[test]
    fn test_no_emitter_is_zero() {
        let out = emission(None);
        assert!(out.value().is_zero());
        assert_eq!(out.kind(), VarKind::Constant);
    }
}
