use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rand::Rng;

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    // A cutoff inside a DST gap has no local reading; take it as UTC then.
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// End of the publishing window that starts at `now`: today's `cutoff`, or
/// tomorrow's once today's has passed.
pub fn window_end<Tz: TimeZone>(now: &DateTime<Tz>, cutoff: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    let end = resolve_local(&tz, today.and_time(cutoff));
    if end >= *now {
        return end;
    }
    match today.succ_opt() {
        Some(tomorrow) => resolve_local(&tz, tomorrow.and_time(cutoff)),
        None => now.clone(),
    }
}

/// `count` publish times drawn uniformly from `[now, window_end]`, ascending.
pub fn generate_post_times<Tz, R>(
    now: DateTime<Tz>,
    cutoff: NaiveTime,
    count: usize,
    rng: &mut R,
) -> Vec<DateTime<Utc>>
where
    Tz: TimeZone,
    R: Rng + ?Sized,
{
    let end = window_end(&now, cutoff);
    let range_ms = (end - now.clone()).num_milliseconds().max(0);
    let start = now.with_timezone(&Utc);

    let mut times: Vec<DateTime<Utc>> = (0..count)
        .map(|_| {
            let offset = (rng.gen::<f64>() * range_ms as f64) as i64;
            start + Duration::milliseconds(offset)
        })
        .collect();
    times.sort();
    times
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(18, 0, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 14, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_times_are_sorted_and_inside_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for (h, m) in [(6, 0), (9, 30), (14, 15), (17, 59)] {
            let now = at(h, m);
            let end = at(18, 0);
            let times = generate_post_times(now, cutoff(), 20, &mut rng);

            assert_eq!(times.len(), 20);
            assert!(times.windows(2).all(|w| w[0] <= w[1]));
            assert!(times.iter().all(|t| *t >= now && *t <= end));
        }
    }

    #[test]
    fn test_times_spread_over_the_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let times = generate_post_times(at(8, 0), cutoff(), 200, &mut rng);
        let midpoint = at(13, 0);
        let early = times.iter().filter(|t| **t < midpoint).count();
        assert!(early > 50 && early < 150, "early = {}", early);
    }

    #[test]
    fn test_at_cutoff_window_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = at(18, 0);
        let times = generate_post_times(now, cutoff(), 3, &mut rng);
        assert!(times.iter().all(|t| *t == now));
    }

    #[test]
    fn test_after_cutoff_rolls_to_next_day() {
        let now = at(21, 0);
        let end = window_end(&now, cutoff());
        assert_eq!(end, now + Duration::hours(21));

        let mut rng = StdRng::seed_from_u64(3);
        let times = generate_post_times(now, cutoff(), 10, &mut rng);
        assert!(times.iter().all(|t| *t >= now && *t <= end));
    }

    #[test]
    fn test_zero_posts() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_post_times(at(9, 0), cutoff(), 0, &mut rng).is_empty());
    }
}
