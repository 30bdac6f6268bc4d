#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Purchase,
    PurchaseResult { purchase_id: u64 },
    History,
    Winning { purchase_id: u64 },
    Statistics,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Purchase => "Purchase",
            Screen::PurchaseResult { .. } => "Issued tickets",
            Screen::History => "Purchase history",
            Screen::Winning { .. } => "Winning check",
            Screen::Statistics => "Statistics",
        }
    }

    pub fn purchase_id(&self) -> Option<u64> {
        match self {
            Screen::PurchaseResult { purchase_id } | Screen::Winning { purchase_id } => {
                Some(*purchase_id)
            }
            _ => None,
        }
    }

    /// Screens inside the purchase flow hide the main menu.
    pub fn shows_menu(&self) -> bool {
        self.purchase_id().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GoHome,
    GoPurchase,
    Purchased { purchase_id: u64, amount: u64 },
    GoHistory,
    SelectPurchase { purchase_id: u64 },
    CheckWinning,
    GoStatistics,
}

/// Next screen for `action`. Checking winnings needs a purchase in view;
/// without one it falls back to home.
pub fn transition(current: Screen, action: Action) -> Screen {
    match action {
        Action::GoHome => Screen::Home,
        Action::GoPurchase => Screen::Purchase,
        Action::Purchased { purchase_id, .. } | Action::SelectPurchase { purchase_id } => {
            Screen::PurchaseResult { purchase_id }
        }
        Action::GoHistory => Screen::History,
        Action::GoStatistics => Screen::Statistics,
        Action::CheckWinning => match current.purchase_id() {
            Some(purchase_id) => Screen::Winning { purchase_id },
            None => Screen::Home,
        },
    }
}

#[derive(Debug)]
pub struct Navigator {
    screen: Screen,
    last_amount: Option<u64>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            last_amount: None,
        }
    }
}

impl Navigator {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Amount of the most recent purchase, offered as the next default.
    pub fn last_amount(&self) -> Option<u64> {
        self.last_amount
    }

    pub fn apply(&mut self, action: Action) -> Screen {
        if let Action::Purchased { amount, .. } = action {
            self.last_amount = Some(amount);
        }
        let next = transition(self.screen, action);
        tracing::debug!("screen {:?} -> {:?} via {:?}", self.screen, next, action);
        self.screen = next;
        next
    }
}
