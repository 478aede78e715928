// Collected currency

/// Flower count carried by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wallet {
    flower_count: u64,
}

impl Wallet {
    pub fn new(flower_count: u64) -> Self {
        Self { flower_count }
    }

    pub fn count(&self) -> u64 {
        self.flower_count
    }

    /// Add collected value, returning the new total
    pub fn add(&mut self, value: u32) -> u64 {
        self.flower_count = self.flower_count.saturating_add(u64::from(value));
        self.flower_count
    }

    /// Spend `amount` if the wallet holds enough
    pub fn spend(&mut self, amount: u64) -> bool {
        if amount > self.flower_count {
            return false;
        }
        self.flower_count -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_spend() {
        let mut wallet = Wallet::default();
        assert_eq!(wallet.add(1), 1);
        assert_eq!(wallet.add(5), 6);
        assert!(!wallet.spend(10));
        assert!(wallet.spend(4));
        assert_eq!(wallet.count(), 2);
    }
}
