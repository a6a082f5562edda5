use chrono::{FixedOffset, Offset, Utc};

use crate::output::format::{detect_output_mode, OutputMode};

pub struct RunContext {
    pub output_mode: OutputMode,
    pub tz: FixedOffset,
}

impl RunContext {
    /// Create context from CLI arguments
    pub fn from_args(json: bool, utc: bool) -> Self {
        let output_mode = detect_output_mode(json);
        let tz = if utc {
            Utc.fix()
        } else {
            *chrono::Local::now().offset()
        };

        RunContext { output_mode, tz }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_flag_gives_zero_offset() {
        let ctx = RunContext::from_args(false, true);
        assert_eq!(ctx.tz, FixedOffset::east_opt(0).unwrap());
        assert_eq!(ctx.output_mode, OutputMode::Markdown);
    }

    #[test]
    fn default_gives_local_offset() {
        let ctx = RunContext::from_args(true, false);
        let local_offset = *chrono::Local::now().offset();
        assert_eq!(ctx.tz, local_offset);
        assert_eq!(ctx.output_mode, OutputMode::Json);
    }
}
