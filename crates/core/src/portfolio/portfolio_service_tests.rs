#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use coinfolio_market_data::{
        DailyClose, DailyCloseProvider, MarketDataError, PriceAtResolver, TickerProvider,
        TradeLookupProvider, TradeTick,
    };

    use crate::fills::{Fill, FillSource, OrderNormalizer, OrderStatus, OrderType, Side};
    use crate::portfolio::PortfolioService;

    struct FlatCloses {
        close: Decimal,
    }

    #[async_trait]
    impl DailyCloseProvider for FlatCloses {
        async fn daily_closes(
            &self,
            symbol: &str,
            start_date: NaiveDate,
        ) -> Result<Vec<DailyClose>, MarketDataError> {
            let mut closes = Vec::new();
            let mut date = start_date;
            for _ in 0..30 {
                closes.push(DailyClose {
                    symbol: symbol.to_string(),
                    date,
                    close: self.close,
                });
                date = date.succ_opt().unwrap();
            }
            Ok(closes)
        }
    }

    struct FixedTickers {
        prices: HashMap<String, Decimal>,
    }

    #[async_trait]
    impl TickerProvider for FixedTickers {
        async fn current_prices(
            &self,
            _assets: &[String],
        ) -> Result<HashMap<String, Decimal>, MarketDataError> {
            Ok(self.prices.clone())
        }
    }

    /// No trades anywhere - lookups always come back empty.
    struct NoTrades;

    #[async_trait]
    impl TradeLookupProvider for NoTrades {
        async fn trades_between(
            &self,
            _symbol: &str,
            _start: chrono::DateTime<Utc>,
            _end: chrono::DateTime<Utc>,
        ) -> Result<Vec<TradeTick>, MarketDataError> {
            Ok(vec![])
        }
    }

    /// Rate limits the first `limit_count` calls, then serves the fills.
    struct FlakyFillSource {
        fills: Vec<Fill>,
        limit_count: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl FillSource for FlakyFillSource {
        async fn fetch_fills(
            &self,
            _pairs: &[(String, String)],
        ) -> Result<Vec<Fill>, MarketDataError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.limit_count {
                Err(MarketDataError::RateLimited {
                    provider: "exchange".to_string(),
                })
            } else {
                Ok(self.fills.clone())
            }
        }
    }

    fn fill(base: &str, side: Side, price: Decimal, qty: Decimal, d: u32) -> Fill {
        Fill {
            order_id: d as i64,
            base_asset: base.to_string(),
            quote_asset: "USDT".to_string(),
            side,
            order_type: OrderType::Limit,
            status: OrderStatus::Filled,
            price,
            executed_qty: qty,
            quote_qty: price * qty,
            timestamp: Utc.with_ymd_and_hms(2021, 3, d, 12, 0, 0).unwrap(),
        }
    }

    fn service(prices: &[(&str, Decimal)]) -> PortfolioService {
        PortfolioService::new(
            Arc::new(FlatCloses { close: dec!(100) }),
            Arc::new(FixedTickers {
                prices: prices
                    .iter()
                    .map(|(asset, price)| (asset.to_string(), *price))
                    .collect(),
            }),
        )
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn analyses_every_asset_group_independently() {
        let fills = vec![
            fill("LTC", Side::Buy, dec!(100), dec!(4), 1),
            fill("ADA", Side::Buy, dec!(1), dec!(500), 2),
            fill("LTC", Side::Sell, dec!(110), dec!(1), 5),
        ];
        let analysis = service(&[("LTC", dec!(120)), ("ADA", dec!(2))])
            .analyze(fills, as_of())
            .await
            .unwrap();

        assert!(analysis.failures.is_empty());
        assert_eq!(analysis.reports.len(), 2);
        let ltc = &analysis.reports["LTC"];
        assert_eq!(ltc.reconciliation.holding_qty, dec!(3));
        assert_eq!(ltc.history.len(), 10);
        assert_eq!(analysis.rows.len(), 2);
        assert_eq!(analysis.rows[0].base_asset, "ADA");
        assert_eq!(analysis.portfolio_history.len(), 10);
    }

    #[tokio::test]
    async fn one_broken_group_does_not_sink_the_others() {
        let fills = vec![
            fill("LTC", Side::Buy, dec!(100), dec!(4), 1),
            // A sale with no purchase history behind it.
            fill("XRP", Side::Sell, dec!(1), dec!(300), 2),
        ];
        let analysis = service(&[("LTC", dec!(120))])
            .analyze(fills, as_of())
            .await
            .unwrap();

        assert_eq!(analysis.reports.len(), 1);
        assert!(analysis.reports.contains_key("LTC"));
        assert_eq!(analysis.failures.len(), 1);
        assert_eq!(analysis.failures[0].0, "XRP");
        assert!(analysis.failures[0].1.contains("not all orders are listed"));
        assert_eq!(analysis.rows.len(), 1);
    }

    #[tokio::test]
    async fn analyze_is_idempotent() {
        let fills = vec![
            fill("LTC", Side::Buy, dec!(100), dec!(4), 1),
            fill("LTC", Side::Sell, dec!(110), dec!(1), 5),
        ];
        let service = service(&[("LTC", dec!(120))]);
        let first = service.analyze(fills.clone(), as_of()).await.unwrap();
        let second = service.analyze(fills, as_of()).await.unwrap();
        assert_eq!(first.rows, second.rows);
        assert_eq!(
            first.reports["LTC"].reconciliation,
            second.reports["LTC"].reconciliation
        );
    }

    #[tokio::test]
    async fn analyze_account_retries_rate_limited_fetches() {
        let source = FlakyFillSource {
            fills: vec![fill("LTC", Side::Buy, dec!(100), dec!(4), 1)],
            limit_count: 1,
            calls: AtomicU32::new(0),
        };
        let normalizer = OrderNormalizer::new(Arc::new(PriceAtResolver::new(Arc::new(NoTrades))));
        let pairs = vec![("LTC".to_string(), "USDT".to_string())];

        let analysis = service(&[("LTC", dec!(120))])
            .analyze_account(&source, &normalizer, &pairs, as_of())
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(analysis.reports.len(), 1);
    }
}
