use std::time::Duration;

pub(super) const fn default_count() -> usize {
    3
}

pub(super) const fn default_duration() -> Duration {
    Duration::from_secs(2)
}

pub(super) const fn default_enqueue_gap() -> Duration {
    Duration::from_millis(250)
}

pub(super) fn default_appname() -> String {
    "toastq".to_string()
}
