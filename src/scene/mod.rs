use crate::emitter::Emitter;
use crate::reflection::BxDF;
use crate::shapes::Shape;
use crate::{Float, Vec3, INFINITY};

/// A shape together with its optional material and light.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub shape: Shape,
    pub bxdf: Option<BxDF>,
    pub emitter: Option<Emitter>,
}

impl Primitive {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            bxdf: None,
            emitter: None,
        }
    }

    pub fn with_bxdf(mut self, bxdf: BxDF) -> Self {
        self.bxdf = Some(bxdf);
        self
    }

    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    fn requires_grad(&self) -> bool {
        let bxdf = match &self.bxdf {
            Some(BxDF::Diffuse { color }) | Some(BxDF::Specular { color, .. }) => color.requires_grad(),
            Some(BxDF::Mirror) | None => false,
        };
        let emitter = self.emitter.as_ref().map_or(false, |e| e.emission().requires_grad());
        bxdf || emitter
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RaycastHit<'s> {
    pub t: Float,
    pub point: Vec3,
    pub normal: Vec3,
    pub primitive: &'s Primitive,
}

impl<'s> RaycastHit<'s> {
    pub fn bxdf(&self) -> Option<&'s BxDF> {
        self.primitive.bxdf.as_ref()
    }

    pub fn emitter(&self) -> Option<&'s Emitter> {
        self.primitive.emitter.as_ref()
    }
}

/// Ordered list of primitives. Built up front, then only read while rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    requires_grad: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.requires_grad |= primitive.requires_grad();
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// True if any material or light parameter is a tracked variable.
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Closest hit along the ray over every primitive. On equal distances the earlier
    /// primitive wins.
    pub fn raycast(&self, orig: Vec3, dir: Vec3) -> Option<RaycastHit<'_>> {
        let mut t_min = INFINITY;
        let mut closest = None;
        for primitive in &self.primitives {
            match primitive.shape.intersect(orig, dir) {
                Some(t) if t < t_min => {
                    t_min = t;
                    closest = Some(primitive);
                }
                _ => {}
            }
        }

        closest.map(|primitive| {
            let point = orig + dir * t_min;
            RaycastHit {
                t: t_min,
                point,
                normal: primitive.shape.normal(point),
                primitive,
            }
        })
    }
}

impl std::iter::FromIterator<Primitive> for Scene {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        let mut scene = Scene::new();
        for p in iter {
            scene.push(p);
        }
        scene
    }
}
