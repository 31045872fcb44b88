#[macro_use]
mod macros;

pub mod area;
pub mod cost;
pub mod energy;
pub mod flow;
pub mod length;
pub mod rate;
pub mod time;
pub mod volume;

#[cfg(test)]
mod tests {
    use super::{length::Metres, time::Hours};

    #[test]
    fn test_min_max_clamp() {
        assert_eq!(Metres(1.0).min(Metres(2.0)), Metres(1.0));
        assert_eq!(Metres(1.0).max(Metres(2.0)), Metres(2.0));
        assert_eq!(Metres(8.0).clamp(Metres::ZERO, Metres(7.0)), Metres(7.0));
        assert_eq!(Metres(-0.5).clamp(Metres::ZERO, Metres(7.0)), Metres::ZERO);
    }

    #[test]
    fn test_display_precision() {
        assert_eq!(Metres(4.0).to_string(), "4.00 m");
        assert_eq!(format!("{:.0}", Hours(13.0)), "13 h");
    }

    #[test]
    fn test_parse() {
        assert_eq!("4.5".parse::<Metres>().unwrap(), Metres(4.5));
    }

    #[test]
    fn test_sum() {
        let total: Metres = [Metres(1.0), Metres(2.5)].into_iter().sum();
        assert_eq!(total, Metres(3.5));
    }
}
