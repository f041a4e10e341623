#[cfg(test)]
mod tests_summary_package {
    use crate::fixtures::{as_of, init_tracing, model_from, ocf_export};
    use captable_rs::{
        CAPTABLE_SUMMARY_FORMAT_VERSION, CapTableSummary, CapTableSummaryPackage,
        HoldingCategories, LedgerError,
    };
    use rust_decimal_macros::dec;

    fn summary() -> CapTableSummary {
        init_tracing();
        let model = model_from(&ocf_export());
        CapTableSummary::from_view(&model, HoldingCategories::ALL).expect("summary")
    }

    #[test]
    fn summary_rounds_converted_preferred_per_class() {
        let summary = summary();
        let fund = summary.row("sh-fund").expect("fund row");

        assert_eq!(fund.stock.get("cls-seed"), Some(&dec!(1000001)));
        assert_eq!(fund.stock.get("cls-a"), Some(&dec!(400000)));
        assert_eq!(fund.warrants.get("cls-seed"), Some(&dec!(15000)));
        // 1000001 * 3/2 floors to 1500001; 400000 * 3 is exact
        assert_eq!(fund.as_converted_total, dec!(2715001));
    }

    #[test]
    fn summary_totals() {
        let summary = summary();

        assert_eq!(summary.as_of_date, as_of());
        assert_eq!(
            summary.row("sh-founder").map(|row| row.as_converted_total),
            Some(dec!(4825000))
        );
        assert_eq!(
            summary.row("sh-employee").map(|row| row.as_converted_total),
            Some(dec!(100000))
        );
        assert_eq!(summary.options_remaining.get("plan-2019"), Some(&dec!(1900000)));
        assert_eq!(summary.fully_diluted_total, dec!(9540001));
        assert_eq!(summary.stock_class_total("cls-common"), dec!(4750000));
    }

    #[test]
    fn package_json_round_trip_validates() {
        let original = summary();
        let package = CapTableSummaryPackage::new(original.clone()).expect("package");
        assert_eq!(package.version, CAPTABLE_SUMMARY_FORMAT_VERSION);
        assert_eq!(package.checksum.len(), 64);

        let json = package.to_json().expect("serialize package");
        let restored = CapTableSummaryPackage::from_json(&json)
            .expect("deserialize package")
            .into_summary()
            .expect("valid package");

        assert_eq!(restored, original);
    }

    #[test]
    fn package_checksum_is_deterministic() {
        let first = CapTableSummaryPackage::new(summary()).expect("package");
        let second = CapTableSummaryPackage::new(summary()).expect("package");
        assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn tampered_json_is_rejected() {
        let package = CapTableSummaryPackage::new(summary()).expect("package");
        let json = package
            .to_json()
            .expect("serialize package")
            .replace("Example Robotics", "Another Robotics");

        let result = CapTableSummaryPackage::from_json(&json).and_then(|package| package.validate());
        assert!(matches!(result, Err(LedgerError::ChecksumMismatch { .. })));
    }

    #[test]
    fn garbage_json_is_a_deserialization_error() {
        assert!(matches!(
            CapTableSummaryPackage::from_json("{\"version\": 1}"),
            Err(LedgerError::DeserializationError { .. })
        ));
    }
}
