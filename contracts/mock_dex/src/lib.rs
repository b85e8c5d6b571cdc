#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// # Mock DEX — router and pair in one contract
///
/// Test venue for the token's swap-back path. Holds one token/native pool
/// with constant-product pricing and a 0.3% swap fee (997/1000), mints LP
/// shares by Babylonian square root on the first deposit and by minimum
/// reserve ratio afterwards, and pays swap proceeds out in the native
/// asset. Tokens are pulled from the caller via `transfer_from`, so the
/// caller must have approved this contract first.
///
/// This is a fixture, not a venue for real funds: no minimum-liquidity
/// lock, no LP burn/withdraw path, no price oracle.
#[ink::contract]
mod mock_dex {
    use ink::env::call::{build_call, ExecutionInput, Selector};
    use ink::env::DefaultEnvironment;
    use ink::storage::Mapping;

    /// Swap fee numerator and denominator: 0.3% stays in the pool.
    pub const FEE_NUMERATOR: u128 = 997;
    pub const FEE_DENOMINATOR: u128 = 1_000;

    #[ink(storage)]
    pub struct MockDex {
        /// The token side of the pool; the native asset is the other side.
        token: AccountId,
        token_reserve: Balance,
        native_reserve: Balance,
        lp_total: Balance,
        lp_balances: Mapping<AccountId, Balance>,
    }

    #[ink(event)]
    pub struct Swap {
        #[ink(topic)]
        caller: AccountId,
        token_in: Balance,
        native_out: Balance,
    }

    #[ink(event)]
    pub struct LiquidityAdded {
        #[ink(topic)]
        provider: AccountId,
        token_amount: Balance,
        native_amount: Balance,
        liquidity: Balance,
    }

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        /// Swap or deposit amount is zero.
        ZeroAmount,
        /// A reserve is empty; the pool cannot price the trade.
        InsufficientLiquidity,
        /// Output or minted liquidity fell below the caller's minimum.
        SlippageExceeded,
        /// Pulling tokens from the caller or paying out native failed.
        TransferFailed,
        /// An arithmetic operation overflowed.
        Overflow,
    }

    /// Constant-product output for `amount_in` against the given reserves,
    /// after the 0.3% fee. Truncating division, Uniswap-V2 form.
    pub fn get_amount_out(
        amount_in: Balance,
        reserve_in: Balance,
        reserve_out: Balance,
    ) -> Result<Balance, Error> {
        if amount_in == 0 {
            return Err(Error::ZeroAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(Error::InsufficientLiquidity);
        }
        let in_with_fee = amount_in.checked_mul(FEE_NUMERATOR).ok_or(Error::Overflow)?;
        let numerator = in_with_fee.checked_mul(reserve_out).ok_or(Error::Overflow)?;
        let denominator = reserve_in
            .checked_mul(FEE_DENOMINATOR)
            .ok_or(Error::Overflow)?
            .checked_add(in_with_fee)
            .ok_or(Error::Overflow)?;
        Ok(numerator / denominator)
    }

    /// Babylonian integer square root.
    pub fn isqrt(y: u128) -> u128 {
        if y > 3 {
            let mut z = y;
            let mut x = y / 2 + 1;
            while x < z {
                z = x;
                x = (y / x + x) / 2;
            }
            z
        } else if y != 0 {
            1
        } else {
            0
        }
    }

    /// LP shares minted for a deposit. First deposit mints
    /// `sqrt(native × tokens)`; later deposits mint by the smaller reserve
    /// ratio so unbalanced deposits donate the excess to the pool.
    /// Deposit products must fit in `u128`; larger deposits fail with
    /// `Overflow` rather than wrapping.
    pub fn liquidity_minted(
        token_amount: Balance,
        native_amount: Balance,
        token_reserve: Balance,
        native_reserve: Balance,
        lp_total: Balance,
    ) -> Result<Balance, Error> {
        if token_amount == 0 || native_amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if lp_total == 0 {
            let product = token_amount
                .checked_mul(native_amount)
                .ok_or(Error::Overflow)?;
            return Ok(isqrt(product));
        }
        let by_token = token_amount
            .checked_mul(lp_total)
            .ok_or(Error::Overflow)?
            / token_reserve;
        let by_native = native_amount
            .checked_mul(lp_total)
            .ok_or(Error::Overflow)?
            / native_reserve;
        Ok(core::cmp::min(by_token, by_native))
    }

    impl MockDex {
        #[ink(constructor)]
        pub fn new(token: AccountId) -> Self {
            Self {
                token,
                token_reserve: 0,
                native_reserve: 0,
                lp_total: 0,
                lp_balances: Mapping::default(),
            }
        }

        // ── Views ─────────────────────────────────────────────────────────

        #[ink(message)]
        pub fn get_reserves(&self) -> (Balance, Balance) {
            (self.token_reserve, self.native_reserve)
        }

        #[ink(message)]
        pub fn get_token(&self) -> AccountId {
            self.token
        }

        #[ink(message)]
        pub fn lp_total_supply(&self) -> Balance {
            self.lp_total
        }

        #[ink(message)]
        pub fn lp_balance_of(&self, account: AccountId) -> Balance {
            self.lp_balances.get(account).unwrap_or(0)
        }

        /// Quote against the live reserves without trading.
        #[ink(message)]
        pub fn quote_tokens_for_native(&self, amount_in: Balance) -> Result<Balance, Error> {
            get_amount_out(amount_in, self.token_reserve, self.native_reserve)
        }

        // ── Trading ───────────────────────────────────────────────────────

        /// Pull `amount_in` tokens from the caller, pay out native to `to`.
        /// Fails with `SlippageExceeded` if the output is below `min_out`.
        #[ink(message)]
        pub fn swap_exact_tokens_for_native(
            &mut self,
            amount_in: Balance,
            min_out: Balance,
            to: AccountId,
        ) -> Result<Balance, Error> {
            let caller = self.env().caller();
            let out = self.record_swap(amount_in, min_out)?;
            self.pull_tokens(caller, amount_in)?;
            self.env()
                .transfer(to, out)
                .map_err(|_| Error::TransferFailed)?;
            self.env().emit_event(Swap {
                caller,
                token_in: amount_in,
                native_out: out,
            });
            Ok(out)
        }

        /// Pull `token_amount` tokens from the caller and take the attached
        /// native value as the other side of the deposit. LP shares go to
        /// `to`. Returns `(token_amount, native_amount, liquidity)`.
        #[ink(message, payable)]
        pub fn add_liquidity_native(
            &mut self,
            token_amount: Balance,
            min_liquidity: Balance,
            to: AccountId,
        ) -> Result<(Balance, Balance, Balance), Error> {
            let caller = self.env().caller();
            let native_amount = self.env().transferred_value();
            let minted = self.record_liquidity(token_amount, native_amount, min_liquidity, to)?;
            self.pull_tokens(caller, token_amount)?;
            self.env().emit_event(LiquidityAdded {
                provider: to,
                token_amount,
                native_amount,
                liquidity: minted,
            });
            Ok((token_amount, native_amount, minted))
        }

        // ── Internal bookkeeping, separated from the token pull ───────────

        /// Price the swap and move the reserves. The token side is updated
        /// optimistically; the caller pulls the tokens right after.
        fn record_swap(&mut self, amount_in: Balance, min_out: Balance) -> Result<Balance, Error> {
            let out = get_amount_out(amount_in, self.token_reserve, self.native_reserve)?;
            if out < min_out {
                return Err(Error::SlippageExceeded);
            }
            self.token_reserve = self
                .token_reserve
                .checked_add(amount_in)
                .ok_or(Error::Overflow)?;
            // out < native_reserve is guaranteed by the pricing formula.
            self.native_reserve -= out;
            Ok(out)
        }

        fn record_liquidity(
            &mut self,
            token_amount: Balance,
            native_amount: Balance,
            min_liquidity: Balance,
            to: AccountId,
        ) -> Result<Balance, Error> {
            let minted = liquidity_minted(
                token_amount,
                native_amount,
                self.token_reserve,
                self.native_reserve,
                self.lp_total,
            )?;
            if minted == 0 || minted < min_liquidity {
                return Err(Error::SlippageExceeded);
            }
            self.token_reserve = self
                .token_reserve
                .checked_add(token_amount)
                .ok_or(Error::Overflow)?;
            self.native_reserve = self
                .native_reserve
                .checked_add(native_amount)
                .ok_or(Error::Overflow)?;
            self.lp_total = self.lp_total.checked_add(minted).ok_or(Error::Overflow)?;
            let current = self.lp_balances.get(to).unwrap_or(0);
            self.lp_balances
                .insert(to, &(current.checked_add(minted).ok_or(Error::Overflow)?));
            Ok(minted)
        }

        /// `transfer_from(caller → this contract)` on the pool token. The
        /// token's error enum is fieldless, so the Err payload is one byte.
        fn pull_tokens(&self, from: AccountId, amount: Balance) -> Result<(), Error> {
            let contract = self.env().account_id();
            let result: Result<(), u8> = build_call::<DefaultEnvironment>()
                .call(self.token)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("transfer_from")))
                        .push_arg(from)
                        .push_arg(contract)
                        .push_arg(amount),
                )
                .returns::<Result<(), u8>>()
                .invoke();
            result.map_err(|_| Error::TransferFailed)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ink::env::{test, DefaultEnvironment};

        type Env = DefaultEnvironment;

        fn accounts() -> test::DefaultAccounts<Env> {
            test::default_accounts::<Env>()
        }

        fn pool_with(token_reserve: Balance, native_reserve: Balance) -> MockDex {
            let mut dex = MockDex::new(accounts().django);
            dex.token_reserve = token_reserve;
            dex.native_reserve = native_reserve;
            dex.lp_total = isqrt(token_reserve * native_reserve);
            dex
        }

        // ── Pricing ───────────────────────────────────────────────────────

        #[ink::test]
        fn amount_out_matches_constant_product_with_fee() {
            // 1 000 in against 10 000 / 10 000:
            // 997 000 × 10 000 / (10 000 000 + 997 000) = 906 (truncated).
            assert_eq!(get_amount_out(1_000, 10_000, 10_000), Ok(906));
        }

        #[ink::test]
        fn amount_out_is_below_no_fee_price() {
            let with_fee = get_amount_out(1_000, 10_000, 10_000).unwrap();
            // No-fee constant product would give 1000×10000/11000 = 909.
            assert!(with_fee < 909);
        }

        #[ink::test]
        fn amount_out_zero_input_rejected() {
            assert_eq!(get_amount_out(0, 10_000, 10_000), Err(Error::ZeroAmount));
        }

        #[ink::test]
        fn amount_out_empty_reserves_rejected() {
            assert_eq!(
                get_amount_out(1_000, 0, 10_000),
                Err(Error::InsufficientLiquidity)
            );
            assert_eq!(
                get_amount_out(1_000, 10_000, 0),
                Err(Error::InsufficientLiquidity)
            );
        }

        #[ink::test]
        fn amount_out_never_drains_reserve() {
            // Even an enormous input cannot pay out the full opposite side.
            let out = get_amount_out(u64::MAX as u128, 10_000, 10_000).unwrap();
            assert!(out < 10_000);
        }

        // ── Square root ───────────────────────────────────────────────────

        #[ink::test]
        fn isqrt_small_values() {
            assert_eq!(isqrt(0), 0);
            assert_eq!(isqrt(1), 1);
            assert_eq!(isqrt(3), 1);
            assert_eq!(isqrt(4), 2);
        }

        #[ink::test]
        fn isqrt_perfect_and_near_squares() {
            assert_eq!(isqrt(144), 12);
            assert_eq!(isqrt(143), 11);
            assert_eq!(isqrt(145), 12);
            assert_eq!(isqrt(1_000_000_000_000), 1_000_000);
        }

        // ── LP minting ────────────────────────────────────────────────────

        #[ink::test]
        fn first_mint_is_geometric_mean() {
            let minted = liquidity_minted(400_000, 100_000, 0, 0, 0).unwrap();
            assert_eq!(minted, 200_000);
        }

        #[ink::test]
        fn first_mint_huge_deposit_fails_instead_of_wrapping() {
            // Product exceeds u128; the fixture refuses rather than wraps.
            let huge = 1u128 << 70;
            assert_eq!(
                liquidity_minted(huge, huge, 0, 0, 0),
                Err(Error::Overflow)
            );
        }

        #[ink::test]
        fn proportional_mint_is_exact() {
            // Doubling both reserves doubles the LP supply.
            let minted =
                liquidity_minted(400_000, 100_000, 400_000, 100_000, 200_000).unwrap();
            assert_eq!(minted, 200_000);
        }

        #[ink::test]
        fn unbalanced_mint_takes_smaller_ratio() {
            // Token side would mint 200 000 shares, native side only 50 000.
            let minted =
                liquidity_minted(400_000, 25_000, 400_000, 100_000, 200_000).unwrap();
            assert_eq!(minted, 50_000);
        }

        #[ink::test]
        fn zero_sided_deposit_rejected() {
            assert_eq!(liquidity_minted(0, 100_000, 0, 0, 0), Err(Error::ZeroAmount));
            assert_eq!(liquidity_minted(100_000, 0, 0, 0, 0), Err(Error::ZeroAmount));
        }

        // ── Bookkeeping ───────────────────────────────────────────────────

        #[ink::test]
        fn swap_moves_both_reserves() {
            let mut dex = pool_with(10_000, 10_000);
            let out = dex.record_swap(1_000, 0).unwrap();
            assert_eq!(out, 906);
            assert_eq!(dex.get_reserves(), (11_000, 9_094));
        }

        #[ink::test]
        fn swap_fee_grows_the_invariant() {
            let mut dex = pool_with(10_000, 10_000);
            let k_before = 10_000u128 * 10_000;
            dex.record_swap(1_000, 0).unwrap();
            let (t, n) = dex.get_reserves();
            assert!(t * n > k_before);
        }

        #[ink::test]
        fn swap_respects_min_out() {
            let mut dex = pool_with(10_000, 10_000);
            assert_eq!(dex.record_swap(1_000, 907), Err(Error::SlippageExceeded));
            // State untouched on failure.
            assert_eq!(dex.get_reserves(), (10_000, 10_000));
        }

        #[ink::test]
        fn liquidity_credits_receiver_and_reserves() {
            let mut dex = MockDex::new(accounts().django);
            let eve = accounts().eve;
            let minted = dex.record_liquidity(400_000, 100_000, 0, eve).unwrap();
            assert_eq!(minted, 200_000);
            assert_eq!(dex.lp_balance_of(eve), 200_000);
            assert_eq!(dex.lp_total_supply(), 200_000);
            assert_eq!(dex.get_reserves(), (400_000, 100_000));
        }

        #[ink::test]
        fn liquidity_respects_min_liquidity() {
            let mut dex = MockDex::new(accounts().django);
            assert_eq!(
                dex.record_liquidity(400_000, 100_000, 200_001, accounts().eve),
                Err(Error::SlippageExceeded)
            );
            assert_eq!(dex.lp_total_supply(), 0);
        }
    }
}
