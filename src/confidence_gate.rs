/// A probability exactly at the threshold counts as confident.
pub fn gate(probability: f32, threshold: f32) -> bool {
    probability >= threshold
}
