//! Chart dimension parsing
//!
//! Container sizes come in as property strings: empty or "auto" lets each
//! chart pick its own default size, anything else must be a pixel count.

use tracing::warn;

/// Chart container dimension - explicit pixels or "auto" (chart default)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChartDimension {
    #[default]
    Auto,
    Pixels(u32),
}

impl ChartDimension {
    /// Parse from a property value
    ///
    /// Valid formats:
    /// - "auto" or "" (empty) → Auto
    /// - "1500" → Pixels(1500) if in valid range [100, 10000]
    pub fn parse(value: &str, default: ChartDimension) -> Self {
        let trimmed = value.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return ChartDimension::Auto;
        }

        match trimmed.parse::<u32>() {
            Ok(px) if (100..=10000).contains(&px) => ChartDimension::Pixels(px),
            Ok(px) => {
                warn!(
                    "Chart dimension {} out of valid range [100-10000], using default: {:?}",
                    px, default
                );
                default
            }
            Err(_) => {
                warn!(
                    "Invalid chart dimension '{}', using default: {:?}",
                    trimmed, default
                );
                default
            }
        }
    }

    /// Resolve to pixels, `auto_px` being the chart's own default
    pub fn resolve(&self, auto_px: u32) -> f64 {
        match self {
            ChartDimension::Pixels(px) => f64::from(*px),
            ChartDimension::Auto => f64::from(auto_px),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_dimension_auto() {
        let dim = ChartDimension::parse("auto", ChartDimension::Auto);
        assert_eq!(dim, ChartDimension::Auto);
        assert_eq!(dim.resolve(960), 960.0);
    }

    #[test]
    fn test_chart_dimension_empty_string() {
        let dim = ChartDimension::parse("", ChartDimension::Pixels(500));
        assert_eq!(dim, ChartDimension::Auto);
    }

    #[test]
    fn test_chart_dimension_pixels() {
        let dim = ChartDimension::parse(" 1500 ", ChartDimension::Auto);
        assert_eq!(dim, ChartDimension::Pixels(1500));
        assert_eq!(dim.resolve(960), 1500.0);
    }

    #[test]
    fn test_chart_dimension_invalid() {
        let dim = ChartDimension::parse("wide", ChartDimension::Auto);
        assert_eq!(dim, ChartDimension::Auto);
    }

    #[test]
    fn test_chart_dimension_out_of_range() {
        assert_eq!(
            ChartDimension::parse("50", ChartDimension::Auto),
            ChartDimension::Auto
        );
        assert_eq!(
            ChartDimension::parse("20000", ChartDimension::Pixels(800)),
            ChartDimension::Pixels(800)
        );
        assert_eq!(
            ChartDimension::parse("100", ChartDimension::Auto),
            ChartDimension::Pixels(100)
        );
        assert_eq!(
            ChartDimension::parse("10000", ChartDimension::Auto),
            ChartDimension::Pixels(10000)
        );
    }
}
