#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// # MOG — Fee-on-Transfer Token Engine
///
/// **Role:** Ground-truth ledger, trading gatekeeper, tx/wallet limiter,
/// direction-aware fee collector, and auto-liquidity swap-back executor.
///
/// ## Transfer pipeline
///
/// Every transfer runs the same ordered pipeline; any failing step aborts
/// the whole operation:
///
/// ```text
/// 1. balance check            → InsufficientBalance
/// 2. trading gate             → TradingNotOpen   (skipped for authorized)
/// 3. wallet cap on recipient  → WalletLimitExceeded
/// 4. tx cap on amount         → TxLimitExceeded
/// 5. fee computation          → fee = amount × total_fee × mult / (denom × 100)
/// 6. settlement               → debit full amount, credit net
/// 7. swap-back check          → convert reservoir to liquidity (never reverts)
/// ```
///
/// ## Fee routing
///
/// The multiplier in step 5 is keyed by direction against the registered
/// AMM pair:
///
/// ```text
/// recipient == pair → SELL  (sell_multiplier)
/// sender    == pair → BUY   (buy_multiplier)
/// otherwise         → plain transfer (transfer_multiplier)
/// ```
///
/// Of the fee taken, half is burned (total supply decremented, one
/// `Transfer { to: None }` event) and the remainder is credited to the
/// contract's own balance as the swap-back reservoir. The burn path is
/// single and consistent: `sum(balances) == total_supply` holds after
/// every transfer.
///
/// ## Swap-back
///
/// Once the reservoir crosses `swap_threshold`, the pipeline swaps half of
/// it for the native asset through the configured router and supplies the
/// other half plus the proceeds as liquidity, crediting LP ownership to
/// `auto_liquidity_receiver`. The trigger is guarded by an Idle/Swapping
/// flag released on every exit path; any failure inside it is caught and
/// surfaced as a `SwapBackFailed` event so the enclosing transfer always
/// commits.
#[ink::contract]
mod mog_token {
    use ink::env::call::{build_call, ExecutionInput, Selector};
    use ink::env::DefaultEnvironment;
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    // =========================================================================
    // CONSTANTS
    // =========================================================================

    /// Denominator for fee-multiplier math: a multiplier of 100 is 1×.
    pub const MULTIPLIER_SCALE: u128 = 100;

    /// Default fee denominator; 1 unit of fee = 1% at this setting.
    pub const DEFAULT_FEE_DENOMINATOR: u128 = 100;

    /// Default component fees against `DEFAULT_FEE_DENOMINATOR`.
    pub const DEFAULT_LIQUIDITY_FEE: u128 = 1;
    pub const DEFAULT_MARKETING_FEE: u128 = 2;
    pub const DEFAULT_DEV_FEE: u128 = 1;

    /// Buy/sell multipliers applied from the moment trading opens.
    /// Opening trading is a fee-rate transition, not just an access one.
    pub const LAUNCH_BUY_MULTIPLIER: u128 = 150;
    pub const LAUNCH_SELL_MULTIPLIER: u128 = 200;

    /// Initial per-tx and per-wallet caps, in per-mille of total supply (1%).
    pub const INITIAL_LIMIT_PERMILLE: u128 = 10;

    /// Per-mille denominator for the limit setters.
    pub const PERMILLE: u128 = 1_000;

    /// Allowance sentinel treated as unlimited and never decremented.
    pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

    /// Unspendable burn destination distinct from the zero address,
    /// excluded from circulating supply and from the wallet cap.
    pub const DEAD_ADDRESS: [u8; 32] = [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xde, 0xad,
    ];

    /// The zero sentinel; rejected as an ownership target.
    pub const ZERO_ADDRESS: [u8; 32] = [0u8; 32];

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct MogToken {
        // ── Token metadata ────────────────────────────────────────────────
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: Balance,

        // ── Ledger ────────────────────────────────────────────────────────
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,

        // ── Access control ────────────────────────────────────────────────
        /// `None` once ownership is renounced; there is no recovery path.
        owner: Option<AccountId>,
        /// Addresses exempt from the trading-open gate.
        authorized: Mapping<AccountId, bool>,
        /// Addresses exempt from fee deduction.
        fee_exempt: Mapping<AccountId, bool>,
        /// Addresses exempt from the per-tx and per-wallet caps.
        limit_exempt: Mapping<AccountId, bool>,

        // ── Trading gate & limits ─────────────────────────────────────────
        trading_open: bool,
        max_tx_amount: Balance,
        max_wallet_amount: Balance,

        // ── Fee configuration ─────────────────────────────────────────────
        liquidity_fee: u128,
        marketing_fee: u128,
        dev_fee: u128,
        total_fee: u128,
        fee_denominator: u128,
        buy_multiplier: u128,
        sell_multiplier: u128,
        transfer_multiplier: u128,

        // ── Swap-back ─────────────────────────────────────────────────────
        swap_enabled: bool,
        swap_threshold: Balance,
        /// Idle/Swapping guard; while set, nested transfers skip the
        /// swap-back check entirely.
        in_swap: bool,

        // ── Collaborators & receivers ─────────────────────────────────────
        /// Registered AMM pair address, used for buy/sell detection.
        pair: Option<AccountId>,
        /// Router the swap-back trigger calls into.
        router: Option<AccountId>,
        auto_liquidity_receiver: AccountId,
        marketing_receiver: AccountId,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous: Option<AccountId>,
        #[ink(topic)]
        new: Option<AccountId>,
    }

    /// Emitted exactly once, when the owner opens trading. Records the
    /// elevated launch multipliers that take effect at the same instant.
    #[ink(event)]
    pub struct TradingOpened {
        buy_multiplier: u128,
        sell_multiplier: u128,
    }

    #[ink(event)]
    pub struct FeesUpdated {
        liquidity_fee: u128,
        marketing_fee: u128,
        dev_fee: u128,
        total_fee: u128,
        denominator: u128,
    }

    #[ink(event)]
    pub struct MultipliersUpdated {
        buy: u128,
        sell: u128,
        transfer: u128,
    }

    #[ink(event)]
    pub struct LimitsUpdated {
        max_tx_amount: Balance,
        max_wallet_amount: Balance,
    }

    #[ink(event)]
    pub struct AuthorizationChanged {
        #[ink(topic)]
        account: AccountId,
        authorized: bool,
    }

    #[ink(event)]
    pub struct ExemptionsChanged {
        #[ink(topic)]
        account: AccountId,
        fee_exempt: bool,
        limit_exempt: bool,
    }

    #[ink(event)]
    pub struct SwapBackSettingsUpdated {
        enabled: bool,
        threshold: Balance,
    }

    /// Emitted when a swap-back completes and liquidity has been added.
    #[ink(event)]
    pub struct AutoLiquify {
        native_amount: Balance,
        token_amount: Balance,
    }

    /// Emitted when the swap-back trigger fails. The failure is caught
    /// here and never propagated: transfers keep working even when the
    /// AMM integration misbehaves.
    #[ink(event)]
    pub struct SwapBackFailed {
        reason: Error,
    }

    #[ink(event)]
    pub struct PairUpdated {
        #[ink(topic)]
        pair: AccountId,
    }

    #[ink(event)]
    pub struct RouterUpdated {
        #[ink(topic)]
        router: AccountId,
    }

    #[ink(event)]
    pub struct ReceiversUpdated {
        auto_liquidity_receiver: AccountId,
        marketing_receiver: AccountId,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Collapses the three failure layers of a router call — environment
    /// errors (callee trapped, reverted, not a contract), dispatch errors,
    /// and the router's own typed error — into this contract's error space.
    /// Only a clean `Ok` from the router survives.
    pub fn settle_router_reply<T>(
        reply: Result<ink::MessageResult<Result<T, Error>>, ink::env::Error>,
    ) -> Result<T, Error> {
        match reply {
            Ok(Ok(Ok(value))) => Ok(value),
            _ => Err(Error::TransferFailed),
        }
    }

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        /// Sender's balance is below the transfer amount.
        InsufficientBalance,
        /// Spender's allowance is below the transfer amount.
        InsufficientAllowance,
        /// Trading has not been opened and neither party is authorized.
        TradingNotOpen,
        /// Transfer amount exceeds the per-transaction cap.
        TxLimitExceeded,
        /// Recipient's post-transfer balance would exceed the wallet cap.
        WalletLimitExceeded,
        /// Proposed total fee is not strictly below half the denominator.
        FeeTooHigh,
        /// Caller is not the contract owner.
        NotOwner,
        /// Ownership target is the zero address.
        InvalidOwner,
        /// Limit percent must be at least 1 per-mille.
        WalletPercentTooLow,
        /// An arithmetic operation overflowed.
        Overflow,
        /// Swap-back attempted with no router configured.
        RouterNotConfigured,
        /// A native or cross-contract transfer failed.
        TransferFailed,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl MogToken {
        // ---------------------------------------------------------------------
        // Constructor
        // ---------------------------------------------------------------------

        /// Deploy the token.
        ///
        /// Mints `initial_supply` entirely to the deployer and seeds the
        /// deployer and the contract itself as authorized, fee-exempt and
        /// limit-exempt. Trading starts closed, both caps start at 1% of
        /// supply, all multipliers at 1×, swap-back disabled.
        #[ink(constructor)]
        pub fn new(
            initial_supply: Balance,
            name: String,
            symbol: String,
            auto_liquidity_receiver: AccountId,
            marketing_receiver: AccountId,
        ) -> Self {
            let caller = Self::env().caller();
            let contract = Self::env().account_id();

            let mut balances = Mapping::default();
            balances.insert(caller, &initial_supply);

            let mut authorized = Mapping::default();
            authorized.insert(caller, &true);
            authorized.insert(contract, &true);

            let mut fee_exempt = Mapping::default();
            fee_exempt.insert(caller, &true);
            fee_exempt.insert(contract, &true);

            let mut limit_exempt = Mapping::default();
            limit_exempt.insert(caller, &true);
            limit_exempt.insert(contract, &true);

            let initial_cap = initial_supply / PERMILLE * INITIAL_LIMIT_PERMILLE;

            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: initial_supply,
            });

            Self {
                name,
                symbol,
                decimals: 18,
                total_supply: initial_supply,
                balances,
                allowances: Mapping::default(),
                owner: Some(caller),
                authorized,
                fee_exempt,
                limit_exempt,
                trading_open: false,
                max_tx_amount: initial_cap,
                max_wallet_amount: initial_cap,
                liquidity_fee: DEFAULT_LIQUIDITY_FEE,
                marketing_fee: DEFAULT_MARKETING_FEE,
                dev_fee: DEFAULT_DEV_FEE,
                total_fee: DEFAULT_LIQUIDITY_FEE + DEFAULT_MARKETING_FEE + DEFAULT_DEV_FEE,
                fee_denominator: DEFAULT_FEE_DENOMINATOR,
                buy_multiplier: MULTIPLIER_SCALE,
                sell_multiplier: MULTIPLIER_SCALE,
                transfer_multiplier: MULTIPLIER_SCALE,
                swap_enabled: false,
                swap_threshold: 0,
                in_swap: false,
                pair: None,
                router: None,
                auto_liquidity_receiver,
                marketing_receiver,
            }
        }

        // =====================================================================
        // LEDGER — Standard Token Interface
        // =====================================================================

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, account: AccountId) -> Balance {
            self.balances.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let from = self.env().caller();
            self.transfer_impl(from, to, value)
        }

        /// Overwrites the allowance unconditionally.
        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval {
                owner,
                spender,
                value,
            });
            Ok(())
        }

        /// Delegated transfer. The allowance is decremented first unless it
        /// equals [`UNLIMITED_ALLOWANCE`], which is treated as unlimited and
        /// never reduced.
        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let caller = self.env().caller();
            let current_allowance = self.allowance(from, caller);
            if current_allowance != UNLIMITED_ALLOWANCE {
                if current_allowance < value {
                    return Err(Error::InsufficientAllowance);
                }
                self.allowances
                    .insert((from, caller), &(current_allowance - value));
            }
            self.transfer_impl(from, to, value)
        }

        // =====================================================================
        // VIEW FUNCTIONS
        // =====================================================================

        #[ink(message)]
        pub fn name(&self) -> String {
            self.name.clone()
        }

        #[ink(message)]
        pub fn symbol(&self) -> String {
            self.symbol.clone()
        }

        #[ink(message)]
        pub fn decimals(&self) -> u8 {
            self.decimals
        }

        #[ink(message)]
        pub fn owner(&self) -> Option<AccountId> {
            self.owner
        }

        #[ink(message)]
        pub fn is_trading_open(&self) -> bool {
            self.trading_open
        }

        #[ink(message)]
        pub fn is_authorized(&self, account: AccountId) -> bool {
            self.authorized.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn is_fee_exempt(&self, account: AccountId) -> bool {
            self.fee_exempt.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn is_limit_exempt(&self, account: AccountId) -> bool {
            self.limit_exempt.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn get_max_tx_amount(&self) -> Balance {
            self.max_tx_amount
        }

        #[ink(message)]
        pub fn get_max_wallet_amount(&self) -> Balance {
            self.max_wallet_amount
        }

        #[ink(message)]
        pub fn get_total_fee(&self) -> u128 {
            self.total_fee
        }

        #[ink(message)]
        pub fn get_fee_denominator(&self) -> u128 {
            self.fee_denominator
        }

        #[ink(message)]
        pub fn get_multipliers(&self) -> (u128, u128, u128) {
            (
                self.buy_multiplier,
                self.sell_multiplier,
                self.transfer_multiplier,
            )
        }

        #[ink(message)]
        pub fn get_swap_threshold(&self) -> Balance {
            self.swap_threshold
        }

        #[ink(message)]
        pub fn is_swap_enabled(&self) -> bool {
            self.swap_enabled
        }

        #[ink(message)]
        pub fn get_pair(&self) -> Option<AccountId> {
            self.pair
        }

        #[ink(message)]
        pub fn get_router(&self) -> Option<AccountId> {
            self.router
        }

        /// Total supply minus the balances held by the contract itself and
        /// the dead sentinel — the supply actually in circulation.
        #[ink(message)]
        pub fn circulating_supply(&self) -> Balance {
            let contract = self.env().account_id();
            let dead = AccountId::from(DEAD_ADDRESS);
            self.total_supply
                .saturating_sub(self.balance_of(contract))
                .saturating_sub(self.balance_of(dead))
        }

        /// Native-asset backing per unit of circulating supply, scaled by a
        /// caller-supplied accuracy. The denominator is circulating supply,
        /// not raw total supply: balances on the contract and the dead
        /// sentinel are excluded. Returns 0 when nothing circulates.
        #[ink(message)]
        pub fn get_backing_ratio(&self, accuracy: Balance) -> Balance {
            let circulating = self.circulating_supply();
            if circulating == 0 {
                return 0;
            }
            self.env().balance().saturating_mul(accuracy) / circulating
        }

        // =====================================================================
        // ADMIN
        // =====================================================================

        /// Set the component fees and the denominator. The new total must be
        /// strictly less than half the denominator.
        #[ink(message)]
        pub fn set_fee_parameters(
            &mut self,
            liquidity_fee: u128,
            marketing_fee: u128,
            dev_fee: u128,
            denominator: u128,
        ) -> Result<(), Error> {
            self.only_owner()?;
            let total = liquidity_fee
                .checked_add(marketing_fee)
                .and_then(|t| t.checked_add(dev_fee))
                .ok_or(Error::Overflow)?;
            let doubled = total.checked_mul(2).ok_or(Error::Overflow)?;
            if doubled >= denominator {
                return Err(Error::FeeTooHigh);
            }
            self.liquidity_fee = liquidity_fee;
            self.marketing_fee = marketing_fee;
            self.dev_fee = dev_fee;
            self.total_fee = total;
            self.fee_denominator = denominator;
            self.env().emit_event(FeesUpdated {
                liquidity_fee,
                marketing_fee,
                dev_fee,
                total_fee: total,
                denominator,
            });
            Ok(())
        }

        /// Set the buy/sell/transfer multipliers (100 = 1×).
        ///
        /// No upper bound is enforced: a multiplier large enough to push the
        /// effective fee past 100% zeroes the recipient's credit (the fee is
        /// capped at the transfer amount). Governance is expected to keep
        /// these sane.
        #[ink(message)]
        pub fn set_fee_multipliers(
            &mut self,
            buy: u128,
            sell: u128,
            transfer: u128,
        ) -> Result<(), Error> {
            self.only_owner()?;
            self.buy_multiplier = buy;
            self.sell_multiplier = sell;
            self.transfer_multiplier = transfer;
            self.env().emit_event(MultipliersUpdated {
                buy,
                sell,
                transfer,
            });
            Ok(())
        }

        /// Recompute the per-wallet cap as `total_supply × percent / 1000`.
        #[ink(message)]
        pub fn set_wallet_limit_percent(&mut self, permille: u128) -> Result<(), Error> {
            self.only_owner()?;
            if permille < 1 {
                return Err(Error::WalletPercentTooLow);
            }
            self.max_wallet_amount = self
                .total_supply
                .checked_mul(permille)
                .ok_or(Error::Overflow)?
                / PERMILLE;
            self.env().emit_event(LimitsUpdated {
                max_tx_amount: self.max_tx_amount,
                max_wallet_amount: self.max_wallet_amount,
            });
            Ok(())
        }

        /// Recompute the per-transaction cap as `total_supply × percent / 1000`.
        #[ink(message)]
        pub fn set_tx_limit_percent(&mut self, permille: u128) -> Result<(), Error> {
            self.only_owner()?;
            if permille < 1 {
                return Err(Error::WalletPercentTooLow);
            }
            self.max_tx_amount = self
                .total_supply
                .checked_mul(permille)
                .ok_or(Error::Overflow)?
                / PERMILLE;
            self.env().emit_event(LimitsUpdated {
                max_tx_amount: self.max_tx_amount,
                max_wallet_amount: self.max_wallet_amount,
            });
            Ok(())
        }

        /// Set both caps equal to total supply, making them unbounded in
        /// practice.
        #[ink(message)]
        pub fn remove_limits(&mut self) -> Result<(), Error> {
            self.only_owner()?;
            self.max_tx_amount = self.total_supply;
            self.max_wallet_amount = self.total_supply;
            self.env().emit_event(LimitsUpdated {
                max_tx_amount: self.max_tx_amount,
                max_wallet_amount: self.max_wallet_amount,
            });
            Ok(())
        }

        /// One-way flip of the trading gate. Also raises the buy/sell
        /// multipliers to the launch values, so opening trading is itself a
        /// fee-rate transition. Idempotent once open.
        #[ink(message)]
        pub fn set_trading_open(&mut self) -> Result<(), Error> {
            self.only_owner()?;
            if self.trading_open {
                return Ok(());
            }
            self.trading_open = true;
            self.buy_multiplier = LAUNCH_BUY_MULTIPLIER;
            self.sell_multiplier = LAUNCH_SELL_MULTIPLIER;
            self.env().emit_event(TradingOpened {
                buy_multiplier: self.buy_multiplier,
                sell_multiplier: self.sell_multiplier,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn set_swap_back_settings(
            &mut self,
            enabled: bool,
            threshold: Balance,
        ) -> Result<(), Error> {
            self.only_owner()?;
            self.swap_enabled = enabled;
            self.swap_threshold = threshold;
            self.env().emit_event(SwapBackSettingsUpdated { enabled, threshold });
            Ok(())
        }

        /// Add or remove an address from the trading-gate exemption set.
        /// Mutable only while an owner exists; renouncing ownership freezes
        /// the set.
        #[ink(message)]
        pub fn set_authorized(&mut self, account: AccountId, flag: bool) -> Result<(), Error> {
            self.only_owner()?;
            self.authorized.insert(account, &flag);
            self.env().emit_event(AuthorizationChanged {
                account,
                authorized: flag,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn set_exemptions(
            &mut self,
            account: AccountId,
            fee_exempt: bool,
            limit_exempt: bool,
        ) -> Result<(), Error> {
            self.only_owner()?;
            self.fee_exempt.insert(account, &fee_exempt);
            self.limit_exempt.insert(account, &limit_exempt);
            self.env().emit_event(ExemptionsChanged {
                account,
                fee_exempt,
                limit_exempt,
            });
            Ok(())
        }

        /// Register the AMM pair used for buy/sell detection.
        #[ink(message)]
        pub fn set_pair(&mut self, pair: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.pair = Some(pair);
            self.env().emit_event(PairUpdated { pair });
            Ok(())
        }

        /// Register the router the swap-back trigger calls into.
        #[ink(message)]
        pub fn set_router(&mut self, router: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.router = Some(router);
            self.env().emit_event(RouterUpdated { router });
            Ok(())
        }

        #[ink(message)]
        pub fn set_receivers(
            &mut self,
            auto_liquidity_receiver: AccountId,
            marketing_receiver: AccountId,
        ) -> Result<(), Error> {
            self.only_owner()?;
            self.auto_liquidity_receiver = auto_liquidity_receiver;
            self.marketing_receiver = marketing_receiver;
            self.env().emit_event(ReceiversUpdated {
                auto_liquidity_receiver,
                marketing_receiver,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            if new_owner == AccountId::from(ZERO_ADDRESS) {
                return Err(Error::InvalidOwner);
            }
            let previous = self.owner;
            self.owner = Some(new_owner);
            self.env().emit_event(OwnershipTransferred {
                previous,
                new: Some(new_owner),
            });
            Ok(())
        }

        /// Zeroes the admin pointer permanently. Every owner-gated operation
        /// fails with `NotOwner` from here on, with no recovery path.
        #[ink(message)]
        pub fn renounce_ownership(&mut self) -> Result<(), Error> {
            self.only_owner()?;
            let previous = self.owner;
            self.owner = None;
            self.env().emit_event(OwnershipTransferred {
                previous,
                new: None,
            });
            Ok(())
        }

        /// Send the contract's native balance to the marketing receiver.
        /// Deliberately callable by anyone: only the receiver benefits.
        #[ink(message)]
        pub fn manual_withdraw(&mut self) -> Result<(), Error> {
            let amount = self.env().balance();
            self.env()
                .transfer(self.marketing_receiver, amount)
                .map_err(|_| Error::TransferFailed)
        }

        /// Forward an external token balance stranded on this contract to
        /// the marketing receiver. Also callable by anyone.
        #[ink(message)]
        pub fn sweep_stuck_token(
            &mut self,
            token: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            let receiver = self.marketing_receiver;
            let result: Result<(), Error> = build_call::<DefaultEnvironment>()
                .call(token)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("transfer")))
                        .push_arg(receiver)
                        .push_arg(amount),
                )
                .returns::<Result<(), Error>>()
                .invoke();
            result.map_err(|_| Error::TransferFailed)
        }

        // =====================================================================
        // INTERNAL — Transfer pipeline
        // =====================================================================

        fn transfer_impl(
            &mut self,
            from: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            // 1. Balance check, before any fee deduction.
            if self.balance_of(from) < amount {
                return Err(Error::InsufficientBalance);
            }

            // 2. Trading gate.
            if !self.is_authorized(from) && !self.is_authorized(to) && !self.trading_open {
                return Err(Error::TradingNotOpen);
            }

            let contract = self.env().account_id();
            let dead = AccountId::from(DEAD_ADDRESS);
            let zero = AccountId::from(ZERO_ADDRESS);

            // 3. Wallet cap on the recipient, pre-fee. The contract itself
            //    and the burn sentinels accumulate without bound.
            if !self.is_authorized(from)
                && to != contract
                && to != dead
                && to != zero
                && !self.is_limit_exempt(to)
            {
                let projected = self
                    .balance_of(to)
                    .checked_add(amount)
                    .ok_or(Error::Overflow)?;
                if projected > self.max_wallet_amount {
                    return Err(Error::WalletLimitExceeded);
                }
            }

            // 4. Transaction cap.
            if amount > self.max_tx_amount && !self.is_limit_exempt(from) {
                return Err(Error::TxLimitExceeded);
            }

            // 5. Fee computation.
            let fee = if self.is_fee_exempt(from) || self.is_fee_exempt(to) {
                0
            } else {
                self.compute_fee(from, to, amount)?
            };

            // 6. Settlement: debit the full amount; burn half the fee,
            //    reserve the rest on the contract, credit the remainder.
            self.debit_balance(from, amount)?;

            let burn_amount = fee / 2;
            let reserve_amount = fee - burn_amount;
            if reserve_amount > 0 {
                self.credit_balance(contract, reserve_amount)?;
            }
            if burn_amount > 0 {
                self.total_supply = self.total_supply.saturating_sub(burn_amount);
            }

            let net_amount = amount - fee;
            self.credit_balance(to, net_amount)?;

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value: net_amount,
            });
            if burn_amount > 0 {
                self.env().emit_event(Transfer {
                    from: Some(from),
                    to: None,
                    value: burn_amount,
                });
            }

            // 7. Swap-back check. Never fails the transfer.
            if self.should_swap_back(from) {
                self.swap_back();
            }

            Ok(())
        }

        /// Effective fee for a transfer, by direction against the registered
        /// pair. Truncating integer division; capped at the full amount so a
        /// runaway multiplier can never debit more than was sent.
        fn compute_fee(
            &self,
            from: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<Balance, Error> {
            let multiplier = if self.pair == Some(to) {
                self.sell_multiplier
            } else if self.pair == Some(from) {
                self.buy_multiplier
            } else {
                self.transfer_multiplier
            };

            let divisor = self
                .fee_denominator
                .checked_mul(MULTIPLIER_SCALE)
                .ok_or(Error::Overflow)?;
            let fee = amount
                .checked_mul(self.total_fee)
                .ok_or(Error::Overflow)?
                .checked_mul(multiplier)
                .ok_or(Error::Overflow)?
                / divisor;

            Ok(core::cmp::min(fee, amount))
        }

        fn debit_balance(&mut self, account: AccountId, amount: Balance) -> Result<(), Error> {
            let balance = self.balance_of(account);
            if balance < amount {
                return Err(Error::InsufficientBalance);
            }
            self.balances.insert(account, &(balance - amount));
            Ok(())
        }

        fn credit_balance(&mut self, account: AccountId, amount: Balance) -> Result<(), Error> {
            let balance = self.balance_of(account);
            let new_balance = balance.checked_add(amount).ok_or(Error::Overflow)?;
            self.balances.insert(account, &new_balance);
            Ok(())
        }

        fn only_owner(&self) -> Result<(), Error> {
            match self.owner {
                Some(owner) if owner == self.env().caller() => Ok(()),
                _ => Err(Error::NotOwner),
            }
        }

        // =====================================================================
        // INTERNAL — Swap-back trigger
        // =====================================================================

        /// Whether step 7 of the pipeline should run for this transfer.
        /// Nested invocations while Swapping skip the trigger rather than
        /// fail; the pair's own calls never recurse into it.
        fn should_swap_back(&self, from: AccountId) -> bool {
            self.swap_enabled
                && !self.in_swap
                && self.pair != Some(from)
                && self.balance_of(self.env().account_id()) >= self.swap_threshold
        }

        /// Idle → Swapping → Idle, released on every exit path. The fallible
        /// body's error is caught and surfaced as an event; it never
        /// propagates into the enclosing transfer.
        fn swap_back(&mut self) {
            self.in_swap = true;
            let result = self.execute_swap_back();
            self.in_swap = false;
            if let Err(reason) = result {
                self.env().emit_event(SwapBackFailed { reason });
            }
        }

        /// Swap half the reservoir for native through the router, then add
        /// the other half plus the proceeds as liquidity. LP ownership goes
        /// to `auto_liquidity_receiver`. The router pulls tokens via
        /// `transfer_from`; those nested transfers run the full pipeline
        /// minus step 7.
        fn execute_swap_back(&mut self) -> Result<(), Error> {
            let router = self.router.ok_or(Error::RouterNotConfigured)?;
            let contract = self.env().account_id();

            let reservoir = self.balance_of(contract);
            let tokens = core::cmp::min(reservoir, self.swap_threshold);
            let swap_half = tokens / 2;
            let liquify_half = tokens - swap_half;
            if swap_half == 0 {
                return Ok(());
            }

            // Allowance for the router to pull both halves.
            self.allowances.insert((contract, router), &tokens);

            // try_invoke, not invoke: a router that traps or is not a
            // contract must come back as an Err here, never as a panic
            // that would revert the enclosing transfer.
            let native_received = settle_router_reply(
                build_call::<DefaultEnvironment>()
                    .call(router)
                    .exec_input(
                        ExecutionInput::new(Selector::new(ink::selector_bytes!(
                            "swap_exact_tokens_for_native"
                        )))
                        .push_arg(swap_half)
                        .push_arg(0u128)
                        .push_arg(contract),
                    )
                    .returns::<Result<Balance, Error>>()
                    .try_invoke(),
            )?;

            let (token_amount, native_amount, _liquidity) = settle_router_reply(
                build_call::<DefaultEnvironment>()
                    .call(router)
                    .transferred_value(native_received)
                    .exec_input(
                        ExecutionInput::new(Selector::new(ink::selector_bytes!(
                            "add_liquidity_native"
                        )))
                        .push_arg(liquify_half)
                        .push_arg(0u128)
                        .push_arg(self.auto_liquidity_receiver),
                    )
                    .returns::<Result<(Balance, Balance, Balance), Error>>()
                    .try_invoke(),
            )?;

            self.env().emit_event(AutoLiquify {
                native_amount,
                token_amount,
            });

            Ok(())
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================
    //
    // Sections:
    //   Ledger          — balances, allowances, supply
    //   Trading gate    — open/closed behavior, authorization
    //   Limits          — tx cap, wallet cap, exemptions
    //   Fees            — exact splits, multipliers, truncation, invariant
    //   Swap-back       — trigger predicate, guard, failure swallowing
    //   Admin           — setters, ownership lifecycle
    //   Security        — audit-finding regressions

}
