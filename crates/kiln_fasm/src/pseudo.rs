//! The pseudo-PIP table.
//!
//! Some used PIPs do not correspond to a single configuration feature but
//! to a fixed set of them (or to none at all, for paths that are legal but
//! carry no bits). This table maps `(tile type, dest wire, source wire)`
//! to the feature suffixes emitted in place of the natural
//! `tile.dst.src` line.
//!
//! The table is built once per emission and never mutated afterwards;
//! position-dependent rewrites for SING tiles happen at emission time so
//! the same key serves every tile instance of the type.

use std::collections::HashMap;

/// Key identifying a pseudo-PIP: tile type plus ordered wire pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PseudoPipKey {
    /// Tile type name (e.g. `LIOI3_TBYTESRC`).
    pub tile_type: String,
    /// Destination wire name.
    pub dst: String,
    /// Source wire name.
    pub src: String,
}

impl PseudoPipKey {
    /// Creates a key from its parts.
    pub fn new(
        tile_type: impl Into<String>,
        dst: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            tile_type: tile_type.into(),
            dst: dst.into(),
            src: src.into(),
        }
    }
}

/// The assembled table. An empty suffix list means the PIP is known and
/// emits nothing.
pub type PseudoPipTable = HashMap<PseudoPipKey, Vec<String>>;

/// Builds the 7-series pseudo-PIP table.
pub fn build_pseudo_pip_table() -> PseudoPipTable {
    let mut table = PseudoPipTable::new();
    let mut add = |tile_type: &str, dst: String, src: String, features: Vec<String>| {
        table.insert(PseudoPipKey::new(tile_type, dst, src), features);
    };

    // IOI3 OLOGIC/ILOGIC data paths and IOB33 pad pseudo-paths.
    for s in ["L", "R"] {
        for s2 in ["", "_TBYTESRC", "_TBYTETERM", "_SING"] {
            let halves: &[&str] = if s2 == "_SING" {
                &["", "0", "1"]
            } else {
                &["0", "1"]
            };
            for i in halves {
                let ioi = format!("{s}IOI3{s2}");
                add(
                    &ioi,
                    format!("{s}IOI_OLOGIC{i}_OQ"),
                    format!("IOI_OLOGIC{i}_D1"),
                    vec![
                        format!("OLOGIC_Y{i}.OMUX.D1"),
                        format!("OLOGIC_Y{i}.OQUSED"),
                        format!("OLOGIC_Y{i}.OSERDES.DATA_RATE_TQ.BUF"),
                    ],
                );
                add(
                    &ioi,
                    format!("IOI_ILOGIC{i}_O"),
                    format!("{s}IOI_ILOGIC{i}_D"),
                    vec![
                        format!("IDELAY_Y{i}.IDELAY_TYPE_FIXED"),
                        format!("ILOGIC_Y{i}.ZINV_D"),
                    ],
                );
                add(
                    &ioi,
                    format!("IOI_ILOGIC{i}_O"),
                    format!("{s}IOI_ILOGIC{i}_DDLY"),
                    vec![
                        format!("ILOGIC_Y{i}.IDELMUXE3.P0"),
                        format!("ILOGIC_Y{i}.ZINV_D"),
                    ],
                );
                add(
                    &ioi,
                    format!("{s}IOI_OLOGIC{i}_TQ"),
                    format!("IOI_OLOGIC{i}_T1"),
                    vec![format!("OLOGIC_Y{i}.ZINV_T1")],
                );
                if *i == "0" {
                    let iob = format!("{s}IOB33{s2}");
                    for (dst, src) in [
                        ("IOB_O_IN1", "IOB_O_OUT0"),
                        ("IOB_O_OUT0", "IOB_O0"),
                        ("IOB_T_IN1", "IOB_T_OUT0"),
                        ("IOB_T_OUT0", "IOB_T0"),
                        ("IOB_DIFFI_IN0", "IOB_PADOUT1"),
                    ] {
                        add(&iob, dst.to_string(), src.to_string(), vec![]);
                    }
                }
            }
        }
    }

    // RIOI (high-performance bank) variants.
    for s2 in ["", "_TBYTESRC", "_TBYTETERM", "_SING"] {
        let halves: &[&str] = if s2 == "_SING" { &["0"] } else { &["0", "1"] };
        for i in halves {
            let rioi = format!("RIOI{s2}");
            add(
                &rioi,
                format!("RIOI_OLOGIC{i}_OQ"),
                format!("IOI_OLOGIC{i}_D1"),
                vec![
                    format!("OLOGIC_Y{i}.OMUX.D1"),
                    format!("OLOGIC_Y{i}.OQUSED"),
                    format!("OLOGIC_Y{i}.OSERDES.DATA_RATE_TQ.BUF"),
                ],
            );
            add(
                &rioi,
                format!("RIOI_OLOGIC{i}_OFB"),
                format!("RIOI_OLOGIC{i}_OQ"),
                vec![],
            );
            add(
                &rioi,
                format!("RIOI_O{i}"),
                format!("RIOI_ODELAY{i}_DATAOUT"),
                vec![],
            );
            add(
                &rioi,
                format!("RIOI_OLOGIC{i}_OFB"),
                format!("IOI_OLOGIC{i}_D1"),
                vec![
                    format!("OLOGIC_Y{i}.OMUX.D1"),
                    format!("OLOGIC_Y{i}.OSERDES.DATA_RATE_TQ.BUF"),
                ],
            );
            add(
                &rioi,
                format!("IOI_ILOGIC{i}_O"),
                format!("RIOI_ILOGIC{i}_D"),
                vec![format!("ILOGIC_Y{i}.ZINV_D")],
            );
            add(
                &rioi,
                format!("IOI_ILOGIC{i}_O"),
                format!("RIOI_ILOGIC{i}_DDLY"),
                vec![
                    format!("ILOGIC_Y{i}.IDELMUXE3.P0"),
                    format!("ILOGIC_Y{i}.ZINV_D"),
                ],
            );
            add(
                &rioi,
                format!("RIOI_OLOGIC{i}_TQ"),
                format!("IOI_OLOGIC{i}_T1"),
                vec![format!("OLOGIC_Y{i}.ZINV_T1")],
            );
            add(
                &rioi,
                format!("RIOI_OLOGIC{i}_OFB"),
                format!("RIOI_ODELAY{i}_ODATAIN"),
                vec![format!("OLOGIC_Y{i}.ZINV_ODATAIN")],
            );
            if *i == "0" {
                let riob = format!("RIOB18{s2}");
                for (dst, src) in [
                    ("IOB_O_IN1", "IOB_O_OUT0"),
                    ("IOB_O_OUT0", "IOB_O0"),
                    ("IOB_T_IN1", "IOB_T_OUT0"),
                    ("IOB_T_OUT0", "IOB_T0"),
                    ("IOB_DIFFI_IN0", "IOB_PADOUT1"),
                ] {
                    add(&riob, dst.to_string(), src.to_string(), vec![]);
                }
            }
        }
    }

    // CLK_HROW BUFH mux activations.
    for s1 in ["TOP", "BOT"] {
        for s2 in ["L", "R"] {
            for i in 0..12 {
                let hck = format!("{s2}{i}");
                let buf = format!("{}{i}", if s2 == "R" { "X1Y" } else { "X0Y" });
                add(
                    &format!("CLK_HROW_{s1}_R"),
                    format!("CLK_HROW_CK_HCLK_OUT_{hck}"),
                    format!("CLK_HROW_CK_MUX_OUT_{hck}"),
                    vec![
                        format!("BUFHCE.BUFHCE_{buf}.IN_USE"),
                        format!("BUFHCE.BUFHCE_{buf}.ZINV_CE"),
                    ],
                );
            }
        }

        // CLK_BUFG BUFGCTRL input muxes: selecting one input asserts the
        // ignore/inverter bits of the opposite one.
        for i in 0..16 {
            let bufg = format!("BUFGCTRL.BUFGCTRL_X0Y{i}");
            add(
                &format!("CLK_BUFG_{s1}_R"),
                format!("CLK_BUFG_BUFGCTRL{i}_O"),
                format!("CLK_BUFG_BUFGCTRL{i}_I0"),
                vec![
                    format!("{bufg}.IN_USE"),
                    format!("{bufg}.IS_IGNORE1_INVERTED"),
                    format!("{bufg}.ZINV_CE0"),
                    format!("{bufg}.ZINV_S0"),
                ],
            );
            add(
                &format!("CLK_BUFG_{s1}_R"),
                format!("CLK_BUFG_BUFGCTRL{i}_O"),
                format!("CLK_BUFG_BUFGCTRL{i}_I1"),
                vec![
                    format!("{bufg}.IN_USE"),
                    format!("{bufg}.IS_IGNORE0_INVERTED"),
                    format!("{bufg}.ZINV_CE1"),
                    format!("{bufg}.ZINV_S1"),
                ],
            );
        }
    }

    // HCLK_IOI BUFR bypass. BUFR site Y order is permuted against the
    // regional clock index.
    const RCLK_Y_TO_I: [usize; 4] = [2, 3, 0, 1];
    for (y, i) in RCLK_Y_TO_I.iter().enumerate() {
        for hclk_ioi in ["HCLK_IOI3", "HCLK_IOI"] {
            add(
                hclk_ioi,
                format!("HCLK_IOI_RCLK_OUT{i}"),
                format!("HCLK_IOI_RCLK_BEFORE_DIV{i}"),
                vec![
                    format!("BUFR_Y{y}.IN_USE"),
                    format!("BUFR_Y{y}.BUFR_DIVIDE.BYPASS"),
                ],
            );
        }
    }

    // Interface-tile logic outputs carry no bits but are known legal.
    for s in ["L", "R"] {
        for i in 0..24 {
            add(
                &format!("INT_INTERFACE_{s}"),
                format!("INT_INTERFACE_LOGIC_OUTS_{s}{i}"),
                format!("INT_INTERFACE_LOGIC_OUTS_{s}_B{i}"),
                vec![],
            );
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ologic_data_path_features() {
        let table = build_pseudo_pip_table();
        let key = PseudoPipKey::new("LIOI3", "LIOI_OLOGIC0_OQ", "IOI_OLOGIC0_D1");
        let features = table.get(&key).unwrap();
        assert_eq!(
            features,
            &vec![
                "OLOGIC_Y0.OMUX.D1".to_string(),
                "OLOGIC_Y0.OQUSED".to_string(),
                "OLOGIC_Y0.OSERDES.DATA_RATE_TQ.BUF".to_string(),
            ]
        );
    }

    #[test]
    fn key_is_order_sensitive() {
        let table = build_pseudo_pip_table();
        let reversed = PseudoPipKey::new("LIOI3", "IOI_OLOGIC0_D1", "LIOI_OLOGIC0_OQ");
        assert!(!table.contains_key(&reversed));
    }

    #[test]
    fn iob33_paths_are_known_but_empty() {
        let table = build_pseudo_pip_table();
        for tile in ["LIOB33", "RIOB33_TBYTESRC", "RIOB18", "RIOB18_SING"] {
            let key = PseudoPipKey::new(tile, "IOB_DIFFI_IN0", "IOB_PADOUT1");
            assert!(table.get(&key).unwrap().is_empty(), "missing for {tile}");
        }
    }

    #[test]
    fn sing_variants_cover_unnumbered_half() {
        let table = build_pseudo_pip_table();
        let key = PseudoPipKey::new("LIOI3_SING", "LIOI_OLOGIC_OQ", "IOI_OLOGIC_D1");
        assert!(table.contains_key(&key));
        let key0 = PseudoPipKey::new("LIOI3_SING", "LIOI_OLOGIC0_OQ", "IOI_OLOGIC0_D1");
        assert!(table.contains_key(&key0));
    }

    #[test]
    fn rioi_sing_only_has_half_zero() {
        let table = build_pseudo_pip_table();
        assert!(table.contains_key(&PseudoPipKey::new(
            "RIOI_SING",
            "RIOI_OLOGIC0_OQ",
            "IOI_OLOGIC0_D1"
        )));
        assert!(!table.contains_key(&PseudoPipKey::new(
            "RIOI_SING",
            "RIOI_OLOGIC1_OQ",
            "IOI_OLOGIC1_D1"
        )));
    }

    #[test]
    fn bufh_mux_covers_both_sides() {
        let table = build_pseudo_pip_table();
        let left = table
            .get(&PseudoPipKey::new(
                "CLK_HROW_TOP_R",
                "CLK_HROW_CK_HCLK_OUT_L3",
                "CLK_HROW_CK_MUX_OUT_L3",
            ))
            .unwrap();
        assert_eq!(left[0], "BUFHCE.BUFHCE_X0Y3.IN_USE");
        let right = table
            .get(&PseudoPipKey::new(
                "CLK_HROW_BOT_R",
                "CLK_HROW_CK_HCLK_OUT_R11",
                "CLK_HROW_CK_MUX_OUT_R11",
            ))
            .unwrap();
        assert_eq!(right[1], "BUFHCE.BUFHCE_X1Y11.ZINV_CE");
    }

    #[test]
    fn bufgctrl_mux_asserts_opposite_input_bits() {
        let table = build_pseudo_pip_table();
        let i0 = table
            .get(&PseudoPipKey::new(
                "CLK_BUFG_BOT_R",
                "CLK_BUFG_BUFGCTRL5_O",
                "CLK_BUFG_BUFGCTRL5_I0",
            ))
            .unwrap();
        assert!(i0.contains(&"BUFGCTRL.BUFGCTRL_X0Y5.IS_IGNORE1_INVERTED".to_string()));
        assert!(i0.contains(&"BUFGCTRL.BUFGCTRL_X0Y5.ZINV_S0".to_string()));
        let i1 = table
            .get(&PseudoPipKey::new(
                "CLK_BUFG_BOT_R",
                "CLK_BUFG_BUFGCTRL5_O",
                "CLK_BUFG_BUFGCTRL5_I1",
            ))
            .unwrap();
        assert!(i1.contains(&"BUFGCTRL.BUFGCTRL_X0Y5.IS_IGNORE0_INVERTED".to_string()));
    }

    #[test]
    fn bufr_bypass_index_permutation() {
        let table = build_pseudo_pip_table();
        let entry = table
            .get(&PseudoPipKey::new(
                "HCLK_IOI3",
                "HCLK_IOI_RCLK_OUT2",
                "HCLK_IOI_RCLK_BEFORE_DIV2",
            ))
            .unwrap();
        assert_eq!(entry[0], "BUFR_Y0.IN_USE");
        let entry = table
            .get(&PseudoPipKey::new(
                "HCLK_IOI",
                "HCLK_IOI_RCLK_OUT1",
                "HCLK_IOI_RCLK_BEFORE_DIV1",
            ))
            .unwrap();
        assert_eq!(entry[0], "BUFR_Y3.IN_USE");
    }

    #[test]
    fn interface_outputs_are_empty_entries() {
        let table = build_pseudo_pip_table();
        let key = PseudoPipKey::new(
            "INT_INTERFACE_R",
            "INT_INTERFACE_LOGIC_OUTS_R17",
            "INT_INTERFACE_LOGIC_OUTS_R_B17",
        );
        assert!(table.get(&key).unwrap().is_empty());
    }
}
