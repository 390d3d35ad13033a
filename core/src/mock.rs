//! Seeded mock dataset: a salon's customers spread evenly over the six
//! lifecycle cohorts, with visit timelines that put each customer in the
//! status it is declared with.
//!
//! Same seed + same clock = identical dataset.

use crate::{
    clock::ReferenceClock,
    customer::{Appointment, AppointmentStatus, Contract, Customer, CustomerStatus, Visit},
    dataset::Dataset,
    name_generator::NameGenerator,
    rng::{MockStream, SeededRng},
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

const CONTRACT_AMOUNTS: [f64; 7] = [
    80_000.0, 120_000.0, 150_000.0, 200_000.0, 250_000.0, 300_000.0, 350_000.0,
];
const HIGH_VALUE_AMOUNTS: [f64; 5] = [300_000.0, 350_000.0, 400_000.0, 450_000.0, 500_000.0];
const MID_VALUE_AMOUNTS: [f64; 3] = [200_000.0, 250_000.0, 300_000.0];

const COURSES: [&str; 7] = [
    "Full body plan",
    "Facial course",
    "VIO intensive plan",
    "Upper body course",
    "Lower body course",
    "Premium full body course",
    "Maintenance plan",
];

const TREATMENTS: [&str; 8] = [
    "Full body", "VIO", "Face", "Underarm", "Arms and legs", "Maintenance", "Back", "Nape",
];

const PAYMENT_METHODS: [&str; 5] = ["cash", "credit_card", "qr_payment", "bank_transfer", "installment"];

const MENUS: [(&str, f64); 8] = [
    ("Full body", 28_000.0),
    ("VIO", 15_000.0),
    ("Face", 12_000.0),
    ("Underarm", 8_000.0),
    ("Arms and legs", 18_000.0),
    ("Maintenance", 10_000.0),
    ("Back", 20_000.0),
    ("Nape", 10_000.0),
];

/// The cohort a mock customer is generated for, by index modulo six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    Graduated,
    Lapsed,
    TwoMonths,
    LastMonth,
    RepeatingWithReservation,
    RepeatingNoReservation,
}

impl Cohort {
    pub fn for_index(idx: usize) -> Self {
        match idx % 6 {
            0 => Self::Graduated,
            1 => Self::Lapsed,
            2 => Self::TwoMonths,
            3 => Self::LastMonth,
            4 => Self::RepeatingWithReservation,
            _ => Self::RepeatingNoReservation,
        }
    }

    pub fn status(&self) -> CustomerStatus {
        match self {
            Self::Graduated                => CustomerStatus::Graduated,
            Self::Lapsed                   => CustomerStatus::ThreeMonthsNoVisit,
            Self::TwoMonths                => CustomerStatus::TwoMonthsNoVisit,
            Self::LastMonth                => CustomerStatus::LastMonthVisited,
            Self::RepeatingWithReservation => CustomerStatus::RepeatingWithReservation,
            Self::RepeatingNoReservation   => CustomerStatus::RepeatingNoReservation,
        }
    }

    fn remaining_visits(&self, rng: &mut SeededRng) -> i64 {
        match self {
            Self::Graduated                => 0,
            Self::Lapsed                   => rng.range(1, 3),
            Self::TwoMonths                => rng.range(2, 5),
            Self::LastMonth                => rng.range(3, 7),
            Self::RepeatingWithReservation => rng.range(5, 12),
            Self::RepeatingNoReservation   => rng.range(4, 9),
        }
    }

    fn contract_amount(&self, rng: &mut SeededRng) -> f64 {
        match self {
            Self::Lapsed    => *rng.pick(&HIGH_VALUE_AMOUNTS),
            Self::TwoMonths => *rng.pick(&MID_VALUE_AMOUNTS),
            _               => *rng.pick(&CONTRACT_AMOUNTS),
        }
    }

    fn visit_count(&self, rng: &mut SeededRng) -> i64 {
        match self {
            Self::Graduated                => rng.range(15, 24),
            Self::Lapsed                   => rng.range(10, 14),
            Self::TwoMonths                => rng.range(8, 12),
            Self::LastMonth                => rng.range(5, 8),
            Self::RepeatingWithReservation => rng.range(3, 5),
            Self::RepeatingNoReservation   => rng.range(2, 3),
        }
    }

    /// Days before today the customer signed up: (min, max).
    fn tenure_days(&self) -> (i64, i64) {
        match self {
            Self::Graduated                => (180, 359),
            Self::Lapsed                   => (120, 239),
            Self::TwoMonths                => (90, 179),
            Self::LastMonth                => (60, 119),
            Self::RepeatingWithReservation => (30, 89),
            Self::RepeatingNoReservation   => (0, 59),
        }
    }
}

pub struct MockDataGenerator {
    seed:  u64,
    clock: ReferenceClock,
    declare_statuses: bool,
}

impl MockDataGenerator {
    pub fn new(seed: u64, clock: ReferenceClock) -> Self {
        Self { seed, clock, declare_statuses: true }
    }

    /// Leave `status` unset so every status is derived from the visits.
    pub fn without_declared_statuses(mut self) -> Self {
        self.declare_statuses = false;
        self
    }

    pub fn generate(&self, count: usize) -> Dataset {
        let mut customer_rng = SeededRng::for_stream(self.seed, MockStream::Customers);
        let mut visit_rng = SeededRng::for_stream(self.seed, MockStream::Visits);
        let mut name_rng = SeededRng::for_stream(self.seed, MockStream::Names);

        let mut customers = Vec::with_capacity(count);
        let mut visits = Vec::new();
        let mut cohorts = Vec::with_capacity(count);

        for idx in 0..count {
            let cohort = Cohort::for_index(idx);
            let id = format!("C-{:04}", idx + 1);

            let (min_tenure, max_tenure) = cohort.tenure_days();
            let created_at = self.clock.today - Duration::days(customer_rng.range(min_tenure, max_tenure));

            let customer_visits = self.visit_timeline(&id, cohort, &mut visit_rng);
            let last_visit_date = customer_visits
                .iter()
                .map(|v| v.date)
                .filter(|d| *d <= self.clock.today)
                .max();

            customers.push(Customer {
                name: NameGenerator::generate_full_name(&mut name_rng),
                contract: Contract {
                    course: COURSES[idx % COURSES.len()].to_string(),
                    amount: cohort.contract_amount(&mut customer_rng),
                    remaining_visits: cohort.remaining_visits(&mut customer_rng) as u32,
                },
                last_visit_date,
                status: self.declare_statuses.then(|| cohort.status()),
                // A customer's first visit can predate the sign-up date we roll.
                created_at: customer_visits.first().map(|v| v.date.min(created_at)).or(Some(created_at)),
                id,
            });
            visits.extend(customer_visits);
            cohorts.push(cohort);
        }

        let appointments = self.appointments(&customers, &cohorts);

        log::info!(
            "mock: seed={} generated {} customers, {} visits, {} appointments as of {}",
            self.seed,
            customers.len(),
            visits.len(),
            appointments.len(),
            self.clock.today,
        );
        Dataset { customers, visits, appointments }
    }

    /// The date of the newest past visit for a cohort.
    fn last_visit(&self, cohort: Cohort, rng: &mut SeededRng) -> NaiveDate {
        let today = self.clock.today;
        let pick_in = |first: NaiveDate, last: NaiveDate, rng: &mut SeededRng| {
            first + Duration::days(rng.range(0, (last - first).num_days()))
        };
        match cohort {
            Cohort::Graduated => today - Duration::days(rng.range(100, 200)),
            Cohort::Lapsed    => today - Duration::days(rng.range(100, 160)),
            Cohort::TwoMonths => {
                let w = self.clock.two_months_ago();
                pick_in(w.first, w.last, rng)
            }
            Cohort::LastMonth => {
                let w = self.clock.last_month();
                pick_in(w.first, w.last, rng)
            }
            Cohort::RepeatingWithReservation | Cohort::RepeatingNoReservation => {
                pick_in(self.clock.this_month().first, today, rng)
            }
        }
    }

    fn visit_timeline(&self, customer_id: &str, cohort: Cohort, rng: &mut SeededRng) -> Vec<Visit> {
        let count = cohort.visit_count(rng);
        let mut dates = Vec::with_capacity(count as usize + 1);

        let mut date = self.last_visit(cohort, rng);
        dates.push(date);
        for _ in 1..count {
            date -= Duration::days(rng.range(14, 28));
            dates.push(date);
        }
        dates.reverse();

        if cohort == Cohort::RepeatingWithReservation {
            dates.push(self.clock.today + Duration::days(rng.range(7, 28)));
        }

        dates
            .into_iter()
            .enumerate()
            .map(|(n, date)| Visit {
                id: format!("V-{customer_id}-{}", n + 1),
                customer_id: customer_id.to_string(),
                date,
                amount: Some((rng.range(10, 34) * 1000) as f64),
                staff_name: Some(NameGenerator::staff_name(rng).to_string()),
                treatment: Some(rng.pick(&TREATMENTS).to_string()),
                payment_method: Some(rng.pick(&PAYMENT_METHODS).to_string()),
            })
            .collect()
    }

    /// Last week's completed and the next two weeks' scheduled bookings.
    /// Sundays are closed; Saturdays are busier.
    fn appointments(&self, customers: &[Customer], cohorts: &[Cohort]) -> Vec<Appointment> {
        let mut rng = SeededRng::for_stream(self.seed, MockStream::Appointments);
        let mut appointments = Vec::new();
        if customers.is_empty() {
            return appointments;
        }

        let regulars: Vec<&Customer> = customers
            .iter()
            .zip(cohorts)
            .filter(|(_, c)| **c == Cohort::RepeatingWithReservation)
            .map(|(customer, _)| customer)
            .collect();

        for day_offset in -7..=14i64 {
            let date = self.clock.today + Duration::days(day_offset);
            let per_day = match date.weekday() {
                Weekday::Sun => continue,
                Weekday::Sat => rng.range(6, 9),
                _            => rng.range(4, 6),
            };

            for _ in 0..per_day {
                let customer = if !regulars.is_empty() && rng.chance(0.7) {
                    *rng.pick(&regulars)
                } else {
                    rng.pick(customers)
                };
                let hour = rng.range(10, 18) as u32;
                let minute = *rng.pick(&[0u32, 15, 30, 45]);
                let duration = *rng.pick(&[60i64, 90, 120, 150]);
                let (menu, price) = *rng.pick(&MENUS);

                let Some(start_time) = date.and_hms_opt(hour, minute, 0) else {
                    continue;
                };
                let mut id_bytes = [0u8; 16];
                id_bytes[..8].copy_from_slice(&rng.next_u64_below(u64::MAX).to_le_bytes());
                id_bytes[8..].copy_from_slice(&rng.next_u64_below(u64::MAX).to_le_bytes());

                appointments.push(Appointment {
                    id: uuid::Builder::from_random_bytes(id_bytes).into_uuid().to_string(),
                    customer_id: customer.id.clone(),
                    start_time,
                    end_time: start_time + Duration::minutes(duration),
                    status: if day_offset < 0 {
                        AppointmentStatus::Completed
                    } else {
                        AppointmentStatus::Scheduled
                    },
                    menu: Some(menu.to_string()),
                    price: Some(price),
                    staff_name: Some(NameGenerator::staff_name(&mut rng).to_string()),
                });
            }
        }

        appointments.sort_by_key(|a| a.start_time);
        appointments
    }
}
