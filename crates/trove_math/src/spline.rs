/// One cubic Hermite spline keyframe: the point plus its tangents.
///
/// glTF `CUBICSPLINE` samplers store keyframes as consecutive
/// (in-tangent, point, out-tangent) triplets, which map directly onto this.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicHermite<T> {
    pub in_tangent: T,
    pub point: T,
    pub out_tangent: T,
}

impl<T: Copy> CubicHermite<T> {
    pub fn new(in_tangent: T, point: T, out_tangent: T) -> Self {
        Self {
            in_tangent,
            point,
            out_tangent,
        }
    }

    /// Group a flat (in, point, out, in, point, out, ...) slice into keyframes.
    ///
    /// Trailing values that don't form a full triplet are dropped.
    pub fn from_triplets(values: &[T]) -> Vec<Self> {
        values
            .chunks_exact(3)
            .map(|c| Self::new(c[0], c[1], c[2]))
            .collect()
    }
}
