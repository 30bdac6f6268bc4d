use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LottoError, Result};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
pub const NUMBERS_PER_TICKET: usize = 6;
pub const TICKET_PRICE: u64 = 1000;

/// One issued combination; a `Ticket` only exists once it passed validation.
///
/// Numbers are normalized to ascending order on construction, so a ticket
/// issued as `[7, 3, ...]` reads back and displays as `[3, 7, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Ticket {
    numbers: [u8; NUMBERS_PER_TICKET],
}

impl Ticket {
    pub fn new(numbers: [u8; NUMBERS_PER_TICKET]) -> Result<Self> {
        check_numbers(&numbers).map_err(LottoError::InvalidTicket)?;
        let mut numbers = numbers;
        numbers.sort_unstable();
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8; NUMBERS_PER_TICKET] {
        &self.numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    pub fn match_count(&self, draw: &WinningDraw) -> u8 {
        self.numbers.iter().filter(|n| draw.main.contains(n)).count() as u8
    }

    pub fn has_bonus(&self, draw: &WinningDraw) -> bool {
        self.contains(draw.bonus)
    }
}

impl TryFrom<&[u8]> for Ticket {
    type Error = LottoError;

    fn try_from(numbers: &[u8]) -> Result<Self> {
        let arr: [u8; NUMBERS_PER_TICKET] = numbers.try_into().map_err(|_| {
            LottoError::InvalidTicket(format!(
                "expected {} numbers, got {}",
                NUMBERS_PER_TICKET,
                numbers.len()
            ))
        })?;
        Ticket::new(arr)
    }
}

impl TryFrom<Vec<u8>> for Ticket {
    type Error = LottoError;

    fn try_from(numbers: Vec<u8>) -> Result<Self> {
        Ticket::try_from(numbers.as_slice())
    }
}

impl From<Ticket> for Vec<u8> {
    fn from(ticket: Ticket) -> Self {
        ticket.numbers.to_vec()
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_numbers(&self.numbers))
    }
}

/// The drawn main numbers plus the bonus number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningDraw {
    main: [u8; NUMBERS_PER_TICKET],
    bonus: u8,
}

impl WinningDraw {
    pub fn new(main: [u8; NUMBERS_PER_TICKET], bonus: u8) -> Result<Self> {
        check_numbers(&main).map_err(LottoError::InvalidDraw)?;
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&bonus) {
            return Err(LottoError::InvalidDraw(format!(
                "bonus {} out of range ({}-{})",
                bonus, MIN_NUMBER, MAX_NUMBER
            )));
        }
        if main.contains(&bonus) {
            return Err(LottoError::InvalidDraw(format!(
                "bonus {} duplicates a main number",
                bonus
            )));
        }
        let mut main = main;
        main.sort_unstable();
        Ok(Self { main, bonus })
    }

    /// Builds a draw from loosely-typed input such as CLI arguments.
    pub fn from_slice(main: &[u8], bonus: u8) -> Result<Self> {
        let arr: [u8; NUMBERS_PER_TICKET] = main.try_into().map_err(|_| {
            LottoError::InvalidDraw(format!(
                "expected {} main numbers, got {}",
                NUMBERS_PER_TICKET,
                main.len()
            ))
        })?;
        WinningDraw::new(arr, bonus)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let picked = pick_distinct(rng, NUMBERS_PER_TICKET + 1);
        let mut main = [0u8; NUMBERS_PER_TICKET];
        main.copy_from_slice(&picked[..NUMBERS_PER_TICKET]);
        main.sort_unstable();
        Self {
            main,
            bonus: picked[NUMBERS_PER_TICKET],
        }
    }

    pub fn main(&self) -> &[u8; NUMBERS_PER_TICKET] {
        &self.main
    }

    pub fn bonus(&self) -> u8 {
        self.bonus
    }
}

impl fmt::Display for WinningDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {:2}", format_numbers(&self.main), self.bonus)
    }
}

/// Validates a candidate combination: count, range, uniqueness.
pub fn check_numbers(numbers: &[u8]) -> std::result::Result<(), String> {
    if numbers.len() != NUMBERS_PER_TICKET {
        return Err(format!(
            "expected {} numbers, got {}",
            NUMBERS_PER_TICKET,
            numbers.len()
        ));
    }
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            return Err(format!("number {} out of range ({}-{})", n, MIN_NUMBER, MAX_NUMBER));
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(format!("duplicate number: {}", numbers[i]));
            }
        }
    }
    Ok(())
}

/// Number of tickets bought with `amount`; the amount must be a positive
/// multiple of the ticket price.
pub fn ticket_count(amount: u64, price: u64) -> Result<u32> {
    if price == 0 {
        return Err(LottoError::InvalidAmount("ticket price must be positive".to_string()));
    }
    if amount == 0 {
        return Err(LottoError::InvalidAmount("amount must be positive".to_string()));
    }
    if amount % price != 0 {
        let nearest = amount / price * price;
        return Err(LottoError::InvalidAmount(format!(
            "amount must be a multiple of {} (e.g. {})",
            price, nearest
        )));
    }
    u32::try_from(amount / price)
        .map_err(|_| LottoError::InvalidAmount(format!("amount {} is too large", amount)))
}

pub fn quick_pick<R: Rng + ?Sized>(rng: &mut R) -> Ticket {
    let picked = pick_distinct(rng, NUMBERS_PER_TICKET);
    let mut numbers = [0u8; NUMBERS_PER_TICKET];
    numbers.copy_from_slice(&picked);
    numbers.sort_unstable();
    Ticket { numbers }
}

fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u8> {
    rand::seq::index::sample(rng, MAX_NUMBER as usize, count)
        .into_iter()
        .map(|i| i as u8 + MIN_NUMBER)
        .collect()
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}
