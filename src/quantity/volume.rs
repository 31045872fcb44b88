use std::ops::Div;

use crate::quantity::{area::SquareMetres, length::Metres};

quantity!(CubicMetres, suffix: "m³", precision: 1);

impl Div<SquareMetres> for CubicMetres {
    type Output = Metres;

    fn div(self, rhs: SquareMetres) -> Self::Output {
        Metres(self.0 / rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_change() {
        assert_eq!(CubicMetres(370.0) / SquareMetres(185.0), Metres(2.0));
    }
}
