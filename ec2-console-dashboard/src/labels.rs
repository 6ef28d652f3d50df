// Display helpers for instance rows and badges.

use chrono::{DateTime, Utc};
use ec2_console_common::{Instance, InstanceState, Locale, Message};

/// Badge colour family for a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTone {
    Positive,
    Negative,
    Transitional,
    Neutral,
}

pub fn state_tone(state: &InstanceState) -> StateTone {
    match state {
        InstanceState::Running => StateTone::Positive,
        InstanceState::Stopped => StateTone::Negative,
        InstanceState::Pending | InstanceState::Stopping => StateTone::Transitional,
        _ => StateTone::Neutral,
    }
}

/// Localized state label; provider-specific states are shown verbatim.
pub fn state_label(state: &InstanceState, locale: Locale) -> String {
    Message::StateLabel(state.clone()).text(locale)
}

/// The `Name` tag, or the localized placeholder when the instance has none.
pub fn display_name(instance: &Instance, locale: Locale) -> String {
    instance
        .name()
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Message::NoName.text(locale))
}

pub fn launch_time_label(launch_time: Option<DateTime<Utc>>, locale: Locale) -> String {
    match launch_time {
        None => "-".to_string(),
        Some(t) => match locale {
            Locale::JaJp => t.format("%Y/%m/%d %H:%M:%S").to_string(),
            Locale::EnUs => t.format("%m/%d/%Y, %I:%M:%S %p UTC").to_string(),
        },
    }
}

pub fn address_label(address: Option<&str>) -> &str {
    address.unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn instance(tags: &[(&str, &str)]) -> Instance {
        Instance {
            id: "i-1".into(),
            instance_type: "t2.micro".into(),
            state: InstanceState::Running,
            public_ip: None,
            private_ip: None,
            launch_time: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn tones_per_state() {
        assert_eq!(state_tone(&InstanceState::Running), StateTone::Positive);
        assert_eq!(state_tone(&InstanceState::Stopped), StateTone::Negative);
        assert_eq!(state_tone(&InstanceState::Stopping), StateTone::Transitional);
        assert_eq!(state_tone(&InstanceState::Terminated), StateTone::Neutral);
    }

    #[test]
    fn name_falls_back_to_placeholder() {
        assert_eq!(display_name(&instance(&[("Name", "web")]), Locale::EnUs), "web");
        assert_eq!(display_name(&instance(&[]), Locale::EnUs), "No Name");
        assert_eq!(display_name(&instance(&[("Name", " ")]), Locale::JaJp), "名前なし");
    }

    #[test]
    fn launch_time_formats() {
        let t = Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(launch_time_label(Some(t), Locale::JaJp), "2023/01/02 15:04:05");
        assert_eq!(launch_time_label(Some(t), Locale::EnUs), "01/02/2023, 03:04:05 PM UTC");
        assert_eq!(launch_time_label(None, Locale::EnUs), "-");
        assert_eq!(address_label(None), "-");
    }
}
