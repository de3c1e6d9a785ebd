/// Whether sides `a`, `b`, `c` in any order satisfy Pythagoras.
pub fn is_right_triangle(a: i64, b: i64, c: i64) -> bool {
    let (a2, b2, c2) = ((a as i128).pow(2), (b as i128).pow(2), (c as i128).pow(2));
    a2 + b2 == c2 || b2 + c2 == a2 || c2 + a2 == b2
}
