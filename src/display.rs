//! Terminal rendering of a pair snapshot.

use crate::format::{format_number, format_price, format_timestamp, shorten_address};
use crate::types::PairSnapshot;
use console::style;

/// Maximum fraction digits for reserve/supply display values.
const DISPLAY_FRACTION_DIGITS: usize = 6;

pub fn render_text(snapshot: &PairSnapshot) -> String {
    let mut out = String::new();
    let rule = "═══════════════════════════════════════════════════════════════";

    let block = snapshot
        .block_number
        .map(|n| format!("block {n}"))
        .unwrap_or_else(|| "block n/a".to_string());

    out.push_str(&format!("{}\n", style(rule).cyan()));
    out.push_str(&format!(
        " {}  {}  {}\n",
        style("PAIR").cyan().bold(),
        style(snapshot.pair_address.to_string()).bold(),
        style(block).dim(),
    ));
    out.push_str(&format!("{}\n\n", style(rule).cyan()));

    out.push_str(&format!(" {}\n", style("Tokens").blue().bold()));
    for token in [&snapshot.token0, &snapshot.token1] {
        out.push_str(&format!(
            "   {} {} ({})  {}  {} decimals\n",
            style("•").blue(),
            token.name,
            style(&token.symbol).bold(),
            style(shorten_address(&token.address)).dim(),
            token.decimals,
        ));
    }

    out.push_str(&format!("\n {}\n", style("Reserves").blue().bold()));
    out.push_str(&format!(
        "   {:<8} {}\n",
        snapshot.token0.symbol,
        display_amount(&snapshot.reserves.formatted.reserve0),
    ));
    out.push_str(&format!(
        "   {:<8} {}\n",
        snapshot.token1.symbol,
        display_amount(&snapshot.reserves.formatted.reserve1),
    ));
    let synced = format_timestamp(snapshot.reserves.block_timestamp_last);
    if !synced.is_empty() {
        out.push_str(&format!("   {}\n", style(format!("last update {synced}")).dim()));
    }

    out.push_str(&format!("\n {}\n", style("Total LP supply").blue().bold()));
    out.push_str(&format!(
        "   {}\n",
        display_amount(&snapshot.total_supply.formatted)
    ));

    out.push_str(&format!("\n {}\n", style("Spot prices").blue().bold()));
    out.push_str(&format!(
        "   1 {} = {} {}\n",
        snapshot.token0.symbol,
        style(format_price(snapshot.prices.price0)).green(),
        snapshot.token1.symbol,
    ));
    out.push_str(&format!(
        "   1 {} = {} {}\n",
        snapshot.token1.symbol,
        style(format_price(snapshot.prices.price1)).green(),
        snapshot.token0.symbol,
    ));

    out
}

pub fn render_json(snapshot: &PairSnapshot) -> eyre::Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// The exact decimal string from the fetcher, regrouped for reading. The
/// float round trip here is display-only.
fn display_amount(formatted: &str) -> String {
    format_number(formatted.parse().unwrap_or_default(), DISPLAY_FRACTION_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::EXAMPLE_PAIR;
    use crate::multicall::testing::{USDC, WETH};
    use crate::types::{FormattedReserves, Prices, Reserves, Token, TotalSupply};
    use alloy_primitives::U256;

    fn snapshot() -> PairSnapshot {
        PairSnapshot {
            pair_address: EXAMPLE_PAIR,
            block_number: Some(19_000_000),
            token0: Token {
                address: USDC,
                name: "USD Coin".into(),
                symbol: "USDC".into(),
                decimals: 6,
            },
            token1: Token {
                address: WETH,
                name: "Wrapped Ether".into(),
                symbol: "WETH".into(),
                decimals: 18,
            },
            reserves: Reserves {
                reserve0: 1_500_000_000_000,
                reserve1: 500_000_000_000_000_000_000,
                block_timestamp_last: 1_700_000_000,
                formatted: FormattedReserves {
                    reserve0: "1500000.0".into(),
                    reserve1: "500.0".into(),
                },
            },
            total_supply: TotalSupply {
                raw: U256::from(2_500_000_000_000_000_000u128),
                formatted: "2.5".into(),
            },
            prices: Prices {
                price0: 1.0 / 3000.0,
                price1: 3000.0,
            },
        }
    }

    #[test]
    fn test_text_rendering_shows_grouped_values() {
        let text = render_text(&snapshot());
        assert!(text.contains("USD Coin"));
        assert!(text.contains("1,500,000"));
        assert!(text.contains("2.5"));
        assert!(text.contains("3,000"));
    }

    #[test]
    fn test_json_rendering_round_trips() {
        let json = render_json(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["token0"]["symbol"], "USDC");
        assert_eq!(value["reserves"]["formatted"]["reserve0"], "1500000.0");
        assert_eq!(value["total_supply"]["formatted"], "2.5");
        assert_eq!(value["block_number"], 19_000_000);
    }
}
