#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use coinfolio_market_data::DailyClose;

    use crate::dumps::{FillDumpStore, PriceDumpStore};
    use crate::fills::{Fill, OrderStatus, OrderType, Side};

    fn fill(order_id: i64, price: Decimal, d: u32) -> Fill {
        Fill {
            order_id,
            base_asset: "LTC".to_string(),
            quote_asset: "USDT".to_string(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            status: OrderStatus::Filled,
            price,
            executed_qty: dec!(2),
            quote_qty: price * dec!(2),
            timestamp: Utc.with_ymd_and_hms(2021, 3, d, 12, 0, 0).unwrap(),
        }
    }

    fn close(symbol: &str, d: u32, price: Decimal) -> DailyClose {
        DailyClose {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 3, d).unwrap(),
            close: price,
        }
    }

    #[test]
    fn fills_round_trip_through_the_dump() {
        let dir = tempdir().unwrap();
        let store = FillDumpStore::new(dir.path().join("orders_dump.csv"));

        let fills = vec![fill(1, dec!(100), 1), fill(2, dec!(110), 2)];
        assert_eq!(store.append(&fills).unwrap(), 2);

        let loaded = store.load().unwrap();
        assert_eq!(loaded, fills);
    }

    #[test]
    fn appending_skips_already_dumped_fills() {
        let dir = tempdir().unwrap();
        let store = FillDumpStore::new(dir.path().join("orders_dump.csv"));

        store.append(&[fill(1, dec!(100), 1)]).unwrap();
        let added = store
            .append(&[fill(1, dec!(100), 1), fill(2, dec!(110), 2)])
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn missing_dump_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FillDumpStore::new(dir.path().join("absent.csv"));
        assert!(store.load().unwrap().is_empty());
        assert_eq!(
            PriceDumpStore::new(dir.path().join("absent_prices.csv"))
                .resume_date()
                .unwrap(),
            None
        );
    }

    #[test]
    fn price_dump_resumes_from_its_last_day() {
        let dir = tempdir().unwrap();
        let store = PriceDumpStore::new(dir.path().join("prices_dump.csv"));

        store
            .append(&[close("LTCUSDT", 1, dec!(100)), close("LTCUSDT", 2, dec!(101))])
            .unwrap();
        assert_eq!(
            store.resume_date().unwrap(),
            Some(NaiveDate::from_ymd_opt(2021, 3, 2).unwrap())
        );
    }

    #[test]
    fn refetched_days_replace_previously_dumped_rows() {
        let dir = tempdir().unwrap();
        let store = PriceDumpStore::new(dir.path().join("prices_dump.csv"));

        // First run ends intraday; the last day's close is provisional.
        store
            .append(&[close("LTCUSDT", 1, dec!(100)), close("LTCUSDT", 2, dec!(101))])
            .unwrap();
        // Next run refetches from day 2 with the settled close.
        let added = store
            .append(&[close("LTCUSDT", 2, dec!(105)), close("LTCUSDT", 3, dec!(108))])
            .unwrap();

        assert_eq!(added, 2);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 3);
        let day2 = loaded
            .iter()
            .find(|c| c.date == NaiveDate::from_ymd_opt(2021, 3, 2).unwrap())
            .unwrap();
        assert_eq!(day2.close, dec!(105));
    }

    #[test]
    fn price_dump_keeps_symbols_apart() {
        let dir = tempdir().unwrap();
        let store = PriceDumpStore::new(dir.path().join("prices_dump.csv"));

        store
            .append(&[close("LTCUSDT", 1, dec!(100)), close("ETHUSDT", 1, dec!(2000))])
            .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
