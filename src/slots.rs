use chrono::NaiveDate;

pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 19;
pub const SLOT_COUNT: usize = (LAST_SLOT_HOUR - FIRST_SLOT_HOUR + 1) as usize;

/// Lower bound of the locally estimated capacity of an available slot.
pub const CAPACITY_FLOOR: u32 = 5;

/// One of the fixed hourly booking windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotHour(u32);

impl SlotHour {
    /// 12-hour label, e.g. `09:00 AM`, `12:00 PM`, `07:00 PM`.
    pub fn label(&self) -> String {
        let hour = match self.0 % 12 {
            0 => 12,
            hour => hour,
        };
        let suffix = if self.0 < 12 { "AM" } else { "PM" };
        format!("{hour:02}:00 {suffix}")
    }

    /// 24-hour `HH:MM`, the form appointments are stored in.
    pub fn time_24h(&self) -> String {
        format!("{:02}:00", self.0)
    }
}

pub fn slot_hours() -> impl Iterator<Item = SlotHour> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(SlotHour)
}

pub fn normalize_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn estimated_capacity(current_booking_count: u32, available: bool) -> u32 {
    if available {
        (current_booking_count + 1).max(CAPACITY_FLOOR)
    } else {
        current_booking_count
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_eleven_slots_in_chronological_order() {
        let labels: Vec<String> = slot_hours().map(|slot| slot.label()).collect();
        assert_eq!(
            labels,
            [
                "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "01:00 PM", "02:00 PM",
                "03:00 PM", "04:00 PM", "05:00 PM", "06:00 PM", "07:00 PM",
            ]
        );
        assert_eq!(labels.len(), SLOT_COUNT);
    }

    #[test]
    fn test_labels_and_24_hour_times_agree() {
        for slot in slot_hours() {
            let parsed = NaiveTime::parse_from_str(&slot.label(), "%I:%M %p").unwrap();
            assert_eq!(parsed.format("%H:%M").to_string(), slot.time_24h());
        }
    }

    #[test_case::test_case(9, "09:00 AM", "09:00")]
    #[test_case::test_case(11, "11:00 AM", "11:00")]
    #[test_case::test_case(12, "12:00 PM", "12:00")]
    #[test_case::test_case(13, "01:00 PM", "13:00")]
    #[test_case::test_case(19, "07:00 PM", "19:00")]
    fn test_convert_label(hour: u32, label: &str, time: &str) {
        let slot = slot_hours().find(|slot| slot.time_24h() == time).unwrap();
        assert_eq!(slot, SlotHour(hour));
        assert_eq!(slot.label(), label);
    }

    #[test]
    fn test_date_is_iso_formatted() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(normalize_date(date), "2026-03-07");
    }

    #[test_case::test_case(0, true, 5)]
    #[test_case::test_case(3, true, 5)]
    #[test_case::test_case(4, true, 5)]
    #[test_case::test_case(5, true, 6)]
    #[test_case::test_case(9, true, 10)]
    #[test_case::test_case(0, false, 0)]
    #[test_case::test_case(3, false, 3)]
    #[test_case::test_case(7, false, 7)]
    fn test_capacity_formula(count: u32, available: bool, expected: u32) {
        let capacity = estimated_capacity(count, available);
        assert_eq!(capacity, expected);
        if available {
            assert!(count < capacity);
        }
    }
}
