use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Hour of the day on the user's wall clock.
    fn local_hour(&self) -> u32 {
        self.now().hour()
    }
}

/// Wall clock reporting the local calendar date, which is what budget months
/// are measured against.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Clock pinned to a single date, at noon unless told otherwise.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
    hour: u32,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, hour: 12 }
    }

    /// Hours past 23 are clamped to 23.
    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = hour.min(23);
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.date
            .and_hms_opt(self.hour, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or_else(Utc::now)
    }

    fn today(&self) -> NaiveDate {
        self.date
    }

    fn local_hour(&self) -> u32 {
        self.hour
    }
}
