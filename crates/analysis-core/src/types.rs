use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized per-company fundamentals for one analysis date.
///
/// Absent values stay `None` (or empty for series); nothing is zero-filled.
/// Series are ordered oldest to newest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSet {
    pub ticker: String,
    pub analysis_date: NaiveDate,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Average market price over the trailing price history.
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub book_value_per_share: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub stockholders_equity: Option<f64>,
    #[serde(default)]
    pub ebit: Option<f64>,
    #[serde(default)]
    pub interest_expense: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub current_assets: Option<f64>,
    #[serde(default)]
    pub current_liabilities: Option<f64>,
    #[serde(default)]
    pub net_ppe: Option<f64>,
    #[serde(default)]
    pub depreciation_amortization: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    /// Expected annual earnings growth as a decimal (0.12 = 12%).
    #[serde(default)]
    pub earnings_growth_rate: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub industry_pe: Option<f64>,
    /// Coefficient of variation of historical earnings, supplied by the fetch layer.
    #[serde(default)]
    pub earnings_volatility: Option<f64>,
    #[serde(default)]
    pub revenue_history: Vec<f64>,
    #[serde(default)]
    pub margin_history: Vec<f64>,
    #[serde(default)]
    pub net_income_history: Vec<f64>,
    /// Dividends per share.
    #[serde(default)]
    pub dividend_history: Vec<f64>,
    #[serde(default)]
    pub eps_history: Vec<f64>,
    #[serde(default)]
    pub capex_history: Vec<f64>,
    #[serde(default)]
    pub debt_distress: bool,
    #[serde(default)]
    pub understated_assets: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub cap_size: Option<String>,
}

impl MetricSet {
    pub fn new(ticker: impl Into<String>, analysis_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            analysis_date,
            ..Default::default()
        }
    }

    /// Current price, ignoring non-positive or non-finite quotes.
    pub fn price(&self) -> Option<f64> {
        self.current_price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Banks are valued from dividends rather than net income.
    pub fn is_bank(&self) -> bool {
        self.industry
            .as_deref()
            .map_or(false, |i| i.to_ascii_lowercase().contains("bank"))
    }

    pub fn pe_ratio(&self) -> Option<f64> {
        match (self.price(), self.eps) {
            (Some(price), Some(eps)) if eps > 0.0 => Some(price / eps),
            _ => None,
        }
    }

    /// Book value per share, derived from equity and share count when not supplied.
    pub fn book_value(&self) -> Option<f64> {
        self.book_value_per_share.or_else(|| match (self.stockholders_equity, self.shares_outstanding) {
            (Some(equity), Some(shares)) if shares > 0.0 => Some(equity / shares),
            _ => None,
        })
    }

    pub fn pb_ratio(&self) -> Option<f64> {
        match (self.price(), self.book_value()) {
            (Some(price), Some(bvps)) if bvps > 0.0 => Some(price / bvps),
            _ => None,
        }
    }

    pub fn roe(&self) -> Option<f64> {
        match (self.net_income, self.stockholders_equity) {
            (Some(ni), Some(equity)) if equity > 0.0 => Some(ni / equity),
            _ => None,
        }
    }

    pub fn debt_to_equity(&self) -> Option<f64> {
        match (self.total_debt, self.stockholders_equity) {
            (Some(debt), Some(equity)) if equity > 0.0 => Some(debt / equity),
            _ => None,
        }
    }

    pub fn current_ratio(&self) -> Option<f64> {
        match (self.current_assets, self.current_liabilities) {
            (Some(assets), Some(liabilities)) if liabilities > 0.0 => Some(assets / liabilities),
            _ => None,
        }
    }

    pub fn interest_coverage(&self) -> Option<f64> {
        match (self.ebit, self.interest_expense) {
            (Some(ebit), Some(interest)) if interest.abs() > 0.0 => Some(ebit / interest.abs()),
            _ => None,
        }
    }

    /// Net income plus D&A minus average maintenance capex.
    pub fn owner_earnings(&self) -> Option<f64> {
        let net_income = self.net_income?;
        let depreciation = self.depreciation_amortization?;
        if self.capex_history.is_empty() {
            return None;
        }
        let avg_capex = self.capex_history.iter().map(|c| c.abs()).sum::<f64>()
            / self.capex_history.len() as f64;
        Some(net_income + depreciation - avg_capex)
    }

    pub fn owner_earnings_per_share(&self) -> Option<f64> {
        match (self.owner_earnings(), self.shares_outstanding) {
            (Some(oe), Some(shares)) if shares > 0.0 => Some(oe / shares),
            _ => None,
        }
    }

    pub fn owner_earnings_yield(&self) -> Option<f64> {
        match (self.owner_earnings(), self.market_cap) {
            (Some(oe), Some(cap)) if cap > 0.0 => Some(oe / cap),
            _ => None,
        }
    }

    /// NOPAT over invested capital (equity + debt - cash).
    pub fn roic(&self) -> Option<f64> {
        let ebit = self.ebit?;
        let equity = self.stockholders_equity?;
        let tax_rate = self.tax_rate.unwrap_or(0.21);
        let invested = equity + self.total_debt.unwrap_or(0.0) - self.cash.unwrap_or(0.0);
        if invested > 0.0 {
            Some(ebit * (1.0 - tax_rate) / invested)
        } else {
            None
        }
    }

    pub fn enterprise_value(&self) -> Option<f64> {
        self.market_cap
            .map(|cap| cap + self.total_debt.unwrap_or(0.0) - self.cash.unwrap_or(0.0))
    }

    /// EBIT / enterprise value.
    pub fn earnings_yield(&self) -> Option<f64> {
        match (self.ebit, self.enterprise_value()) {
            (Some(ebit), Some(ev)) if ev > 0.0 => Some(ebit / ev),
            _ => None,
        }
    }

    /// EBIT / (net working capital + net PP&E).
    pub fn return_on_capital(&self) -> Option<f64> {
        let ebit = self.ebit?;
        let working_capital = self.current_assets? - self.current_liabilities?;
        let capital = working_capital + self.net_ppe?;
        if capital > 0.0 {
            Some(ebit / capital)
        } else {
            None
        }
    }

    /// P/E divided by growth expressed in percent.
    pub fn peg_ratio(&self) -> Option<f64> {
        let pe = self.pe_ratio()?;
        match self.earnings_growth_rate {
            Some(growth) if growth > 0.0 => Some(pe / (growth * 100.0)),
            _ => None,
        }
    }

    pub fn net_cash_per_share(&self) -> Option<f64> {
        match (self.cash, self.shares_outstanding) {
            (Some(cash), Some(shares)) if shares > 0.0 => {
                Some((cash - self.total_debt.unwrap_or(0.0)) / shares)
            }
            _ => None,
        }
    }

    /// Net income over market cap.
    pub fn earnings_on_equity(&self) -> Option<f64> {
        match (self.net_income, self.market_cap) {
            (Some(ni), Some(cap)) if cap > 0.0 => Some(ni / cap),
            _ => None,
        }
    }

    /// Fraction (0.0-1.0) of the core scalar fields that are present.
    pub fn completeness(&self) -> f64 {
        let core = [
            self.current_price,
            self.market_cap,
            self.shares_outstanding,
            self.eps,
            self.book_value_per_share,
            self.revenue,
            self.net_income,
            self.stockholders_equity,
            self.ebit,
            self.interest_expense,
            self.total_debt,
            self.cash,
            self.current_assets,
            self.current_liabilities,
            self.free_cash_flow,
            self.earnings_growth_rate,
        ];
        core.iter().filter(|v| v.is_some()).count() as f64 / core.len() as f64
    }
}

/// The five investing philosophies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lens {
    Graham,
    Buffett,
    Lynch,
    Greenblatt,
    Fisher,
}

impl Lens {
    pub const ALL: [Lens; 5] = [Lens::Graham, Lens::Buffett, Lens::Lynch, Lens::Greenblatt, Lens::Fisher];

    pub fn philosopher(&self) -> &'static str {
        match self {
            Lens::Graham => "Benjamin Graham",
            Lens::Buffett => "Warren Buffett",
            Lens::Lynch => "Peter Lynch",
            Lens::Greenblatt => "Joel Greenblatt",
            Lens::Fisher => "Philip Fisher",
        }
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lens::Graham => "Graham",
            Lens::Buffett => "Buffett",
            Lens::Lynch => "Lynch",
            Lens::Greenblatt => "Greenblatt",
            Lens::Fisher => "Fisher",
        };
        write!(f, "{}", name)
    }
}

/// Letter grade for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Monotone step function over the score.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::APlus
        } else if score >= 80.0 {
            Grade::A
        } else if score >= 70.0 {
            Grade::B
        } else if score >= 60.0 {
            Grade::C
        } else if score >= 50.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", s)
    }
}

/// One lens's verdict on a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensResult {
    pub lens: Lens,
    pub philosopher: String,
    /// 0-100
    pub score: f64,
    pub grade: Grade,
    pub key_metric: String,
    pub verdict: String,
    pub insight: String,
}

impl LensResult {
    pub fn new(
        lens: Lens,
        score: f64,
        key_metric: impl Into<String>,
        verdict: impl Into<String>,
        insight: impl Into<String>,
    ) -> Self {
        let score = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
        Self {
            lens,
            philosopher: lens.philosopher().to_string(),
            score,
            grade: Grade::from_score(score),
            key_metric: key_metric.into(),
            verdict: verdict.into(),
            insight: insight.into(),
        }
    }
}

/// Final investment verdict. Ordering follows pick priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    StrongBuy,
    Buy,
    Accumulate,
    Hold,
    Watchlist,
    Reduce,
    Sell,
    Avoid,
    InsufficientData,
}

impl Verdict {
    /// 1 (best) through 9.
    pub fn priority(&self) -> u8 {
        match self {
            Verdict::StrongBuy => 1,
            Verdict::Buy => 2,
            Verdict::Accumulate => 3,
            Verdict::Hold => 4,
            Verdict::Watchlist => 5,
            Verdict::Reduce => 6,
            Verdict::Sell => 7,
            Verdict::Avoid => 8,
            Verdict::InsufficientData => 9,
        }
    }

    pub fn is_buy_side(&self) -> bool {
        matches!(self, Verdict::StrongBuy | Verdict::Buy | Verdict::Accumulate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StrongBuy => "STRONG BUY",
            Verdict::Buy => "BUY",
            Verdict::Accumulate => "ACCUMULATE",
            Verdict::Hold => "HOLD",
            Verdict::Watchlist => "WATCHLIST",
            Verdict::Reduce => "REDUCE",
            Verdict::Sell => "SELL",
            Verdict::Avoid => "AVOID",
            Verdict::InsufficientData => "INSUFFICIENT DATA",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Verdict::StrongBuy => "Exceptional opportunity: high quality at a deep discount to conservative value",
            Verdict::Buy => "Good opportunity: trading with a solid margin of safety",
            Verdict::Accumulate => "Build a position gradually: some discount, some uncertainty",
            Verdict::Hold => "Fair value: hold existing positions, no new capital",
            Verdict::Watchlist => "Quality business without a margin of safety: wait for a better price",
            Verdict::Reduce => "Overvalued: consider trimming the position",
            Verdict::Sell => "Significantly overvalued: exit the position",
            Verdict::Avoid => "Poor quality or unfavorable risk/reward: do not invest",
            Verdict::InsufficientData => "Not enough reliable data to reach a verdict",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Confidence attached to a single valuation method or a composite range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueConfidence {
    High,
    Medium,
    Low,
    Speculative,
}

impl ValueConfidence {
    /// Weight used when averaging method base values.
    pub fn weight(&self) -> f64 {
        match self {
            ValueConfidence::High => 1.5,
            ValueConfidence::Medium => 1.0,
            ValueConfidence::Low => 0.5,
            ValueConfidence::Speculative => 0.25,
        }
    }
}

/// Record-level confidence in the whole analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ConfidenceLevel::High
        } else if score >= 50.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    Dcf,
    Earnings,
    BookValue,
    OwnerEarnings,
    Pad,
    /// Trailing average market price; scored but never part of a range
    Market,
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValuationMethod::Dcf => "DCF",
            ValuationMethod::Earnings => "Earnings",
            ValuationMethod::BookValue => "Book Value",
            ValuationMethod::OwnerEarnings => "Owner Earnings",
            ValuationMethod::Pad => "PAD",
            ValuationMethod::Market => "Market",
        };
        write!(f, "{}", s)
    }
}

/// Per-share intrinsic value as a conservative/base/optimistic triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRange {
    pub method: ValuationMethod,
    pub conservative: f64,
    pub base: f64,
    pub optimistic: f64,
    pub confidence: ValueConfidence,
    pub assumptions: Vec<String>,
}

impl ValuationRange {
    /// Builds a range from three scenario values, reordering them if needed.
    pub fn new(
        method: ValuationMethod,
        conservative: f64,
        base: f64,
        optimistic: f64,
        confidence: ValueConfidence,
    ) -> Self {
        let mut values = [conservative, base, optimistic];
        values.sort_by(f64::total_cmp);
        Self {
            method,
            conservative: values[0],
            base: values[1],
            optimistic: values[2],
            confidence,
            assumptions: Vec::new(),
        }
    }

    /// Wraps a point estimate in a symmetric band of `value * uncertainty`.
    pub fn from_point(
        method: ValuationMethod,
        value: f64,
        uncertainty: f64,
        confidence: ValueConfidence,
    ) -> Self {
        let u = uncertainty.abs();
        Self::new(method, value * (1.0 - u), value, value * (1.0 + u), confidence)
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    /// Whether the range can take part in a composite.
    pub fn is_usable(&self) -> bool {
        self.conservative.is_finite()
            && self.optimistic.is_finite()
            && self.conservative > 0.0
            && self.base > 0.0
    }

    pub fn width(&self) -> f64 {
        self.optimistic - self.conservative
    }
}

/// Range aggregated across every usable valuation method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeValuationRange {
    pub conservative: f64,
    pub base: f64,
    pub optimistic: f64,
    pub confidence: ValueConfidence,
    pub methods: Vec<ValuationRange>,
}

/// Preset lens weightings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentStyle {
    DeepValue,
    QualityValue,
    Garp,
    MagicFormula,
    Growth,
    Balanced,
}

impl InvestmentStyle {
    pub fn name(&self) -> &'static str {
        match self {
            InvestmentStyle::DeepValue => "DEEP_VALUE",
            InvestmentStyle::QualityValue => "QUALITY_VALUE",
            InvestmentStyle::Garp => "GARP",
            InvestmentStyle::MagicFormula => "MAGIC_FORMULA",
            InvestmentStyle::Growth => "GROWTH",
            InvestmentStyle::Balanced => "BALANCED",
        }
    }
}

impl std::str::FromStr for InvestmentStyle {
    type Err = crate::AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "DEEP_VALUE" => Ok(InvestmentStyle::DeepValue),
            "QUALITY_VALUE" => Ok(InvestmentStyle::QualityValue),
            "GARP" => Ok(InvestmentStyle::Garp),
            "MAGIC_FORMULA" => Ok(InvestmentStyle::MagicFormula),
            "GROWTH" => Ok(InvestmentStyle::Growth),
            "BALANCED" => Ok(InvestmentStyle::Balanced),
            other => Err(crate::AnalysisError::InvalidData(format!("unknown investment style '{}'", other))),
        }
    }
}

/// Per-lens weights. Valid weightings are non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensWeights {
    pub graham: f64,
    pub buffett: f64,
    pub lynch: f64,
    pub greenblatt: f64,
    pub fisher: f64,
}

impl LensWeights {
    pub fn get(&self, lens: Lens) -> f64 {
        match lens {
            Lens::Graham => self.graham,
            Lens::Buffett => self.buffett,
            Lens::Lynch => self.lynch,
            Lens::Greenblatt => self.greenblatt,
            Lens::Fisher => self.fisher,
        }
    }

    pub fn sum(&self) -> f64 {
        Lens::ALL.iter().map(|l| self.get(*l)).sum()
    }
}

/// Where the quality scorer takes its weights from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    Preset(InvestmentStyle),
    Custom(LensWeights),
}

impl WeightProfile {
    pub fn name(&self) -> &'static str {
        match self {
            WeightProfile::Preset(style) => style.name(),
            WeightProfile::Custom(_) => "CUSTOM",
        }
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        WeightProfile::Preset(InvestmentStyle::Balanced)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentScore {
    pub lens: Lens,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

/// Weighted aggregate of the lens scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    pub total: f64,
    pub grade: Grade,
    pub breakdown: Vec<ComponentScore>,
    pub style: String,
}

/// Outcome of comparing price against the conservative value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginOfSafety {
    /// price / conservative value; lower is better
    pub ratio: f64,
    pub has_margin: bool,
    pub buy_below_price: f64,
    pub required: f64,
}

/// Per-method margin of safety and MOSEE score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodScore {
    pub method: ValuationMethod,
    pub value: f64,
    pub mos: Option<f64>,
    pub mosee: Option<f64>,
}

/// Immutable per-ticker output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisRecord {
    pub ticker: String,
    pub analysis_date: NaiveDate,
    pub current_price: Option<f64>,

    pub verdict: Verdict,
    pub recommendation: String,

    pub quality_grade: Option<Grade>,
    pub quality_score: Option<f64>,
    pub quality_breakdown: Vec<ComponentScore>,
    pub investment_style: String,

    pub valuation_conservative: Option<f64>,
    pub valuation_base: Option<f64>,
    pub valuation_optimistic: Option<f64>,
    pub valuation_confidence: Option<ValueConfidence>,
    pub valuation_methods: Vec<ValuationRange>,

    pub margin_of_safety: Option<f64>,
    pub has_margin_of_safety: bool,
    pub buy_below_price: Option<f64>,
    pub method_scores: Vec<MethodScore>,

    pub earnings_yield: Option<f64>,
    pub return_on_capital: Option<f64>,

    pub perspectives: Vec<LensResult>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub action_items: Vec<String>,

    pub confidence_level: ConfidenceLevel,
    pub confidence_score: f64,

    pub country: Option<String>,
    pub industry: Option<String>,
    pub cap_size: Option<String>,
}

impl StockAnalysisRecord {
    /// Placeholder record for a ticker whose metrics could not be obtained.
    pub fn insufficient_data(ticker: impl Into<String>, analysis_date: NaiveDate, reason: impl Into<String>) -> Self {
        let ticker = ticker.into();
        let verdict = Verdict::InsufficientData;
        Self {
            action_items: vec![format!("Gather missing fundamentals for {} before evaluating", ticker)],
            ticker,
            analysis_date,
            current_price: None,
            verdict,
            recommendation: verdict.recommendation().to_string(),
            quality_grade: None,
            quality_score: None,
            quality_breakdown: Vec::new(),
            investment_style: String::new(),
            valuation_conservative: None,
            valuation_base: None,
            valuation_optimistic: None,
            valuation_confidence: None,
            valuation_methods: Vec::new(),
            margin_of_safety: None,
            has_margin_of_safety: false,
            buy_below_price: None,
            method_scores: Vec::new(),
            earnings_yield: None,
            return_on_capital: None,
            perspectives: Vec::new(),
            strengths: Vec::new(),
            concerns: vec![reason.into()],
            confidence_level: ConfidenceLevel::Low,
            confidence_score: 0.0,
            country: None,
            industry: None,
            cap_size: None,
        }
    }

    /// MOSEE of the PAD method, the primary valuation-derived score.
    pub fn primary_score(&self) -> Option<f64> {
        self.method_scores
            .iter()
            .find(|s| s.method == ValuationMethod::Pad)
            .and_then(|s| s.mosee)
    }
}
