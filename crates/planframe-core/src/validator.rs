//! Reference validation.
//!
//! Walks master data and working state and reports every reference that does
//! not resolve to an existing entity, or that breaks a configured
//! compatibility allow-list. Nothing is mutated; the result is a flat list of
//! diagnostics, empty when the frame is consistent.
//!
//! Output order is fixed: orders, stocks, product routings, machines, molds,
//! then lots in list order and inventory rows last. Within a lot the checks
//! run product, process, time bucket, machines, molds, machine/mold
//! compatibility and product/mold compatibility.

use std::collections::HashSet;
use std::fmt;

use crate::frame::ProblemFrame;
use crate::state::PlanItem;

/// A single broken reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    OrderUnknownProduct {
        product_code: String,
    },
    OrderUnknownTimeBucket {
        week: String,
    },
    StockUnknownProduct {
        product_code: String,
    },
    StepUnknownProcess {
        product_code: String,
        step_no: i64,
        process_code: String,
    },
    MachineUnknownProcess {
        machine_id: String,
        process_code: String,
    },
    MoldUnknownProcess {
        mold_code: String,
        process_code: String,
    },
    PlanUnknownProduct {
        lot: String,
        product_code: String,
    },
    PlanUnknownProcess {
        lot: String,
        process_code: String,
    },
    PlanUnknownTimeBucket {
        lot: String,
        week: String,
    },
    PlanUnknownMachine {
        lot: String,
        machine_id: String,
    },
    PlanUnknownMold {
        lot: String,
        mold_code: String,
    },
    /// The (machine, mold, process) triple is not in the allow-list.
    IncompatibleMachineMold {
        lot: String,
        machine_id: String,
        mold_code: String,
        process_code: String,
    },
    MoldNotAllowedForProduct {
        lot: String,
        mold_code: String,
        product_code: String,
    },
    InventoryUnknownProduct {
        product_code: String,
    },
    InventoryUnknownTimeBucket {
        time_bucket: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OrderUnknownProduct { product_code } => {
                write!(f, "orders reference unknown product {}", product_code)
            }
            Violation::OrderUnknownTimeBucket { week } => {
                write!(f, "orders reference unknown time bucket {}", week)
            }
            Violation::StockUnknownProduct { product_code } => {
                write!(f, "stocks reference unknown product {}", product_code)
            }
            Violation::StepUnknownProcess {
                product_code,
                step_no,
                process_code,
            } => write!(
                f,
                "product {} step {} refers to unknown process {}",
                product_code, step_no, process_code
            ),
            Violation::MachineUnknownProcess {
                machine_id,
                process_code,
            } => write!(
                f,
                "machine {} refers to unknown process {}",
                machine_id, process_code
            ),
            Violation::MoldUnknownProcess {
                mold_code,
                process_code,
            } => write!(f, "mold {} refers to unknown process {}", mold_code, process_code),
            Violation::PlanUnknownProduct { lot, product_code } => {
                write!(f, "plan {} references unknown product {}", lot, product_code)
            }
            Violation::PlanUnknownProcess { lot, process_code } => {
                write!(f, "plan {} references unknown process {}", lot, process_code)
            }
            Violation::PlanUnknownTimeBucket { lot, week } => {
                write!(f, "plan {} references unknown time bucket {}", lot, week)
            }
            Violation::PlanUnknownMachine { lot, machine_id } => {
                write!(f, "plan {} refers to unknown machine {}", lot, machine_id)
            }
            Violation::PlanUnknownMold { lot, mold_code } => {
                write!(f, "plan {} refers to unknown mold {}", lot, mold_code)
            }
            Violation::IncompatibleMachineMold {
                lot,
                machine_id,
                mold_code,
                process_code,
            } => write!(
                f,
                "plan {} uses incompatible machine/mold/process ({}, {}, {})",
                lot,
                Quoted(machine_id),
                Quoted(mold_code),
                Quoted(process_code)
            ),
            Violation::MoldNotAllowedForProduct {
                lot,
                mold_code,
                product_code,
            } => write!(
                f,
                "plan {} uses mold {} not allowed for product {}",
                lot, mold_code, product_code
            ),
            Violation::InventoryUnknownProduct { product_code } => {
                write!(f, "inventory row references unknown product {}", product_code)
            }
            Violation::InventoryUnknownTimeBucket { time_bucket } => {
                write!(f, "inventory row references unknown time bucket {}", time_bucket)
            }
        }
    }
}

/// String literal in the quoting style of a Python tuple repr: single quotes
/// unless the value holds a single quote and no double quote.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.0.contains('\'') && !self.0.contains('"') {
            '"'
        } else {
            '\''
        };
        write!(f, "{}", quote)?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c == quote => write!(f, "\\{}", c)?,
                c if c.is_ascii_control() => write!(f, "\\x{:02x}", c as u32)?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "{}", quote)
    }
}

/// Lookup sets built once per validation run from master data.
struct ReferenceIndex<'a> {
    products: HashSet<&'a str>,
    processes: HashSet<&'a str>,
    time_buckets: HashSet<&'a str>,
    machines: HashSet<String>,
    molds: HashSet<&'a str>,
    machine_mold_pairs: HashSet<(String, String, String)>,
    /// (product, process, mold); an empty set means no restriction.
    product_molds: HashSet<(&'a str, &'a str, &'a str)>,
}

impl<'a> ReferenceIndex<'a> {
    fn build(frame: &'a ProblemFrame) -> Self {
        let data = &frame.problem_data;

        Self {
            products: data.products.iter().map(|p| p.code.as_str()).collect(),
            processes: data.processes.iter().map(|p| p.code.as_str()).collect(),
            time_buckets: data.time_buckets.iter().map(|tb| tb.id.as_str()).collect(),
            machines: data.resources.machine.iter().map(|m| m.id.as_key()).collect(),
            molds: data.resources.mold.iter().map(|m| m.code.as_str()).collect(),
            machine_mold_pairs: data
                .compatibility
                .machine_mold_pairs
                .iter()
                .map(|pair| {
                    (
                        pair.machine_id.as_key(),
                        pair.mold_code.clone(),
                        pair.process_code.clone(),
                    )
                })
                .collect(),
            product_molds: data
                .compatibility
                .product_molds
                .iter()
                .flat_map(|entry| {
                    entry.allowed_molds.iter().map(move |mold| {
                        (
                            entry.product_code.as_str(),
                            entry.process_code.as_str(),
                            mold.as_str(),
                        )
                    })
                })
                .collect(),
        }
    }

    fn check_plan_item(&self, item: &'a PlanItem, out: &mut Vec<Violation>) {
        let lot = item.label();

        if !self.products.contains(item.product_code.as_str()) {
            out.push(Violation::PlanUnknownProduct {
                lot: lot.to_string(),
                product_code: item.product_code.clone(),
            });
        }
        if !self.processes.contains(item.process_code.as_str()) {
            out.push(Violation::PlanUnknownProcess {
                lot: lot.to_string(),
                process_code: item.process_code.clone(),
            });
        }
        if let Some(week) = item.week.as_deref().filter(|w| !w.is_empty()) {
            if !self.time_buckets.contains(week) {
                out.push(Violation::PlanUnknownTimeBucket {
                    lot: lot.to_string(),
                    week: week.to_string(),
                });
            }
        }

        for machine in item.resources.iter().filter(|r| r.is_machine()) {
            let machine_id = machine.id.as_key();
            if !self.machines.contains(&machine_id) {
                out.push(Violation::PlanUnknownMachine {
                    lot: lot.to_string(),
                    machine_id,
                });
            }
        }

        let molds: Vec<String> = item.molds().map(|r| r.id.as_key()).collect();
        for mold_code in &molds {
            if !self.molds.contains(mold_code.as_str()) {
                out.push(Violation::PlanUnknownMold {
                    lot: lot.to_string(),
                    mold_code: mold_code.clone(),
                });
            }
        }

        if !self.machine_mold_pairs.is_empty() {
            let machine_id = item.machine_key();
            for mold_code in &molds {
                let triple = (
                    machine_id.clone(),
                    mold_code.clone(),
                    item.process_code.clone(),
                );
                if !self.machine_mold_pairs.contains(&triple) {
                    out.push(Violation::IncompatibleMachineMold {
                        lot: lot.to_string(),
                        machine_id: machine_id.clone(),
                        mold_code: mold_code.clone(),
                        process_code: item.process_code.clone(),
                    });
                }
            }
        }

        if !self.product_molds.is_empty() {
            for mold_code in &molds {
                let key = (
                    item.product_code.as_str(),
                    item.process_code.as_str(),
                    mold_code.as_str(),
                );
                if !self.product_molds.contains(&key) {
                    out.push(Violation::MoldNotAllowedForProduct {
                        lot: lot.to_string(),
                        mold_code: mold_code.clone(),
                        product_code: item.product_code.clone(),
                    });
                }
            }
        }
    }
}

/// Every broken reference in the frame, in deterministic order.
pub fn find_violations(frame: &ProblemFrame) -> Vec<Violation> {
    let index = ReferenceIndex::build(frame);
    let data = &frame.problem_data;
    let mut out = Vec::new();

    for group in &data.orders {
        if !index.products.contains(group.product_code.as_str()) {
            out.push(Violation::OrderUnknownProduct {
                product_code: group.product_code.clone(),
            });
        }
        for order in &group.orders {
            if !index.time_buckets.contains(order.week.as_str()) {
                out.push(Violation::OrderUnknownTimeBucket {
                    week: order.week.clone(),
                });
            }
        }
    }

    for stock in &data.stocks {
        if !index.products.contains(stock.product_code.as_str()) {
            out.push(Violation::StockUnknownProduct {
                product_code: stock.product_code.clone(),
            });
        }
    }

    for product in &data.products {
        for step in &product.process_data {
            if !index.processes.contains(step.process_code.as_str()) {
                out.push(Violation::StepUnknownProcess {
                    product_code: product.code.clone(),
                    step_no: step.step_no,
                    process_code: step.process_code.clone(),
                });
            }
        }
    }

    for machine in &data.resources.machine {
        if !index.processes.contains(machine.process_code.as_str()) {
            out.push(Violation::MachineUnknownProcess {
                machine_id: machine.id.as_key(),
                process_code: machine.process_code.clone(),
            });
        }
    }

    for mold in &data.resources.mold {
        if !index.processes.contains(mold.process_code.as_str()) {
            out.push(Violation::MoldUnknownProcess {
                mold_code: mold.code.clone(),
                process_code: mold.process_code.clone(),
            });
        }
    }

    for item in &frame.state.lots {
        index.check_plan_item(item, &mut out);
    }

    for row in &frame.state.inventory {
        if !index.products.contains(row.product_code.as_str()) {
            out.push(Violation::InventoryUnknownProduct {
                product_code: row.product_code.clone(),
            });
        }
        let references = [row.week.as_deref(), row.time_bucket_id.as_deref()];
        for time_bucket in references.into_iter().flatten().filter(|t| !t.is_empty()) {
            if !index.time_buckets.contains(time_bucket) {
                out.push(Violation::InventoryUnknownTimeBucket {
                    time_bucket: time_bucket.to_string(),
                });
            }
        }
    }

    out
}

/// Human-readable diagnostics for every broken reference.
pub fn validate_references(frame: &ProblemFrame) -> Vec<String> {
    find_violations(frame)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::construct_frame;
    use crate::state::PlanResource;
    use serde_json::json;

    fn sample() -> ProblemFrame {
        construct_frame(json!({
            "problemData": {
                "problem_meta": {"problem_code": "PRB_T"},
                "time_buckets": [{"id": "W1", "index": 1}, {"id": "W2", "index": 2}],
                "orders": [{"product_code": "P1", "orders": [{"week": "W1", "qty": 10}]}],
                "stocks": [{"product_code": "P1", "warehouse": "MAIN", "qty": 3}],
                "products": [{
                    "code": "P1", "name": "Part", "base_unit": "PCS",
                    "process_data": [{
                        "step_no": 10, "process_code": "PRESS", "name": "Press",
                        "output_material": "P1", "base_qty": 1, "yield_factor": 1,
                        "setup_time_min": 30, "cycle_time_sec": 12
                    }]
                }],
                "processes": [{"code": "PRESS", "name": "Pressing"}],
                "resources": {
                    "machine": [{"id": 1, "name": "Press 1", "process_code": "PRESS"}],
                    "mold": [
                        {"code": "MD1", "name": "Mold 1", "process_code": "PRESS"},
                        {"code": "MD2", "name": "Mold 2", "process_code": "PRESS"}
                    ]
                },
                "compatibility": {
                    "machine_mold_pairs": [{"machine_id": "1", "mold_code": "MD1", "process_code": "PRESS"}],
                    "product_molds": [{"product_code": "P1", "process_code": "PRESS", "allowed_molds": ["MD1"]}]
                }
            },
            "scenarioConfig": {"meta": {"name": "base"}},
            "state": {
                "plan": [{
                    "lot_id": "L1", "product_code": "P1", "process_code": "PRESS",
                    "week": "W1", "qty": 10,
                    "resources": [{"type": "machine", "id": 1}, {"type": "mold", "id": "MD1"}]
                }],
                "inventory": [{
                    "product_code": "P1", "week": "W1", "time_bucket_id": "W1",
                    "opening_stock": 3, "production_qty": 10, "demand": 10, "closing_stock": 3
                }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_consistent_frame_has_no_violations() {
        assert!(validate_references(&sample()).is_empty());
    }

    #[test]
    fn test_numeric_and_string_machine_ids_match() {
        let mut frame = sample();
        frame.state.lots[0].resources[0] = PlanResource::machine("1");
        assert!(validate_references(&frame).is_empty());
    }

    #[test]
    fn test_unknown_machine_and_mold() {
        let mut frame = sample();
        frame.state.lots[0].resources = vec![PlanResource::machine(9), PlanResource::mold("MDX")];
        let violations = find_violations(&frame);
        assert_eq!(
            violations,
            vec![
                Violation::PlanUnknownMachine { lot: "L1".into(), machine_id: "9".into() },
                Violation::PlanUnknownMold { lot: "L1".into(), mold_code: "MDX".into() },
                Violation::IncompatibleMachineMold {
                    lot: "L1".into(),
                    machine_id: "9".into(),
                    mold_code: "MDX".into(),
                    process_code: "PRESS".into(),
                },
                Violation::MoldNotAllowedForProduct {
                    lot: "L1".into(),
                    mold_code: "MDX".into(),
                    product_code: "P1".into(),
                },
            ]
        );
    }

    #[test]
    fn test_incompatible_triple_message() {
        let mut frame = sample();
        frame.state.lots[0].resources.push(PlanResource::mold("MD2"));
        let errors = validate_references(&frame);
        assert!(errors.contains(
            &"plan L1 uses incompatible machine/mold/process ('1', 'MD2', 'PRESS')".to_string()
        ));
        assert!(errors.contains(&"plan L1 uses mold MD2 not allowed for product P1".to_string()));
    }

    #[test]
    fn test_triple_quoting_follows_tuple_repr() {
        assert_eq!(Quoted("MD1").to_string(), "'MD1'");
        assert_eq!(Quoted("O'Neil").to_string(), "\"O'Neil\"");
        assert_eq!(Quoted("a'b\"c").to_string(), "'a\\'b\"c'");
        assert_eq!(Quoted("C:\\m").to_string(), "'C:\\\\m'");
        assert_eq!(Quoted("x\ty").to_string(), "'x\\ty'");

        let mut frame = sample();
        frame.state.lots[0].resources = vec![PlanResource::machine("M'1"), PlanResource::mold("MD1")];
        frame.problem_data.resources.machine[0].id = "M'1".into();
        assert_eq!(
            validate_references(&frame),
            vec!["plan L1 uses incompatible machine/mold/process (\"M'1\", 'MD1', 'PRESS')"]
        );
    }

    #[test]
    fn test_mold_without_machine_uses_empty_machine_id() {
        let mut frame = sample();
        frame.state.lots[0].resources = vec![PlanResource::mold("MD1")];
        let errors = validate_references(&frame);
        assert_eq!(
            errors,
            vec!["plan L1 uses incompatible machine/mold/process ('', 'MD1', 'PRESS')".to_string()]
        );

        frame.problem_data.compatibility.machine_mold_pairs[0].machine_id = "".into();
        assert!(validate_references(&frame).is_empty());
    }

    #[test]
    fn test_empty_machine_mold_allow_list_is_permissive() {
        let mut frame = sample();
        frame.problem_data.compatibility.machine_mold_pairs.clear();
        frame.problem_data.compatibility.product_molds.clear();
        frame.state.lots[0].resources = vec![
            PlanResource::machine(1),
            PlanResource::mold("MD1"),
            PlanResource::mold("MD2"),
        ];
        assert!(validate_references(&frame).is_empty());
    }

    #[test]
    fn test_product_mold_list_restricts_unlisted_pairs() {
        let mut frame = sample();
        frame.problem_data.compatibility.machine_mold_pairs.clear();
        frame.problem_data.compatibility.product_molds[0].product_code = "P2".into();
        assert_eq!(
            validate_references(&frame),
            vec!["plan L1 uses mold MD1 not allowed for product P1"]
        );
    }

    #[test]
    fn test_product_mold_entries_are_unioned() {
        let mut frame = sample();
        frame.problem_data.compatibility.machine_mold_pairs.clear();
        let mut extra = frame.problem_data.compatibility.product_molds[0].clone();
        extra.allowed_molds = vec!["MD2".into()];
        frame.problem_data.compatibility.product_molds.push(extra);
        frame.state.lots[0].resources.push(PlanResource::mold("MD2"));
        assert!(validate_references(&frame).is_empty());
    }

    #[test]
    fn test_empty_allowed_molds_entry_permits_nothing_when_others_exist() {
        let mut frame = sample();
        frame.problem_data.compatibility.machine_mold_pairs.clear();
        let mut empty = frame.problem_data.compatibility.product_molds[0].clone();
        empty.allowed_molds.clear();
        frame.problem_data.compatibility.product_molds[0].product_code = "P2".into();
        frame.problem_data.compatibility.product_molds.push(empty);
        assert_eq!(
            validate_references(&frame),
            vec!["plan L1 uses mold MD1 not allowed for product P1"]
        );
    }

    #[test]
    fn test_missing_or_empty_week_is_not_an_error() {
        let mut frame = sample();
        frame.state.lots[0].week = None;
        assert!(validate_references(&frame).is_empty());
        frame.state.lots[0].week = Some(String::new());
        assert!(validate_references(&frame).is_empty());
    }

    #[test]
    fn test_lot_without_id_labelled_na() {
        let mut frame = sample();
        frame.state.lots[0].lot_id = None;
        frame.state.lots[0].product_code = "PX".into();
        assert_eq!(
            validate_references(&frame),
            vec!["plan n/a references unknown product PX"]
        );
    }

    #[test]
    fn test_master_data_checks_come_first() {
        let mut frame = sample();
        frame.state.inventory[0].time_bucket_id = Some("W9".into());
        frame.state.lots[0].week = Some("W8".into());
        frame.problem_data.resources.mold[1].process_code = "CUT".into();
        frame.problem_data.resources.machine[0].process_code = "CUT".into();
        frame.problem_data.stocks[0].product_code = "PS".into();
        frame.problem_data.orders[0].orders[0].week = "W7".into();

        assert_eq!(
            validate_references(&frame),
            vec![
                "orders reference unknown time bucket W7",
                "stocks reference unknown product PS",
                "machine 1 refers to unknown process CUT",
                "mold MD2 refers to unknown process CUT",
                "plan L1 references unknown time bucket W8",
                "inventory row references unknown time bucket W9",
            ]
        );
    }

    #[test]
    fn test_inventory_checks_both_time_references() {
        let mut frame = sample();
        frame.state.inventory[0].week = Some("WA".into());
        frame.state.inventory[0].time_bucket_id = Some("WB".into());
        frame.state.inventory[0].product_code = "PZ".into();
        assert_eq!(
            validate_references(&frame),
            vec![
                "inventory row references unknown product PZ",
                "inventory row references unknown time bucket WA",
                "inventory row references unknown time bucket WB",
            ]
        );
    }
}
