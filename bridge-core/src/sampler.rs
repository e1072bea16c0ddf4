//! Two-channel ADC scan bookkeeping.
//!
//! The converter alternates between the PixC and debug sense inputs. A pair is
//! only complete once the debug conversion that follows a PixC conversion has
//! landed; the hardware glue feeds each finished conversion into
//! [`ChannelScan::record`] and reprograms the mux to the returned channel.

use crate::vbus::RawSamplePair;

/// Analog sense input currently selected on the converter mux.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SenseChannel {
    Pixc,
    Dbg,
}

impl SenseChannel {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            SenseChannel::Pixc => SenseChannel::Dbg,
            SenseChannel::Dbg => SenseChannel::Pixc,
        }
    }
}

/// Result of recording one conversion.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScanStep {
    /// Channel to convert next.
    pub next_channel: SenseChannel,
    /// Completed pair, present once per full cycle.
    pub pair: Option<RawSamplePair>,
}

/// Channel scan state for the PixC/debug sense pair.
#[derive(Clone, Debug, Default)]
pub struct ChannelScan {
    pixc: u16,
    debug_pending: bool,
    have_samples: bool,
}

impl ChannelScan {
    /// Starts a scan on the PixC channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pixc: 0,
            debug_pending: false,
            have_samples: false,
        }
    }

    /// Channel the next conversion must be taken from.
    #[must_use]
    pub const fn current_channel(&self) -> SenseChannel {
        if self.debug_pending {
            SenseChannel::Dbg
        } else {
            SenseChannel::Pixc
        }
    }

    /// Records a finished conversion for [`ChannelScan::current_channel`].
    pub fn record(&mut self, conversion: u16) -> ScanStep {
        let channel = self.current_channel();
        let pair = match channel {
            SenseChannel::Pixc => {
                self.pixc = conversion;
                None
            }
            SenseChannel::Dbg => {
                self.have_samples = true;
                Some(RawSamplePair::new(self.pixc, conversion))
            }
        };

        self.debug_pending = channel == SenseChannel::Pixc;
        ScanStep {
            next_channel: channel.other(),
            pair,
        }
    }

    /// Returns `true` once at least one full pair has been produced.
    #[must_use]
    pub const fn samples_ready(&self) -> bool {
        self.have_samples
    }
}

/// Producer of completed sample pairs.
pub trait SampleSource {
    /// Returns the next complete pair, or `None` when no new pair is ready.
    fn fetch(&mut self) -> Option<RawSamplePair>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_completes_only_after_debug_conversion() {
        let mut scan = ChannelScan::new();
        assert_eq!(scan.current_channel(), SenseChannel::Pixc);
        assert!(!scan.samples_ready());

        let first = scan.record(700);
        assert_eq!(first.next_channel, SenseChannel::Dbg);
        assert_eq!(first.pair, None);
        assert!(!scan.samples_ready());

        let second = scan.record(12);
        assert_eq!(second.next_channel, SenseChannel::Pixc);
        assert_eq!(second.pair, Some(RawSamplePair::new(700, 12)));
        assert!(scan.samples_ready());

        assert_eq!(scan.record(650).pair, None);
        assert_eq!(scan.record(640).pair, Some(RawSamplePair::new(650, 640)));
    }
}
