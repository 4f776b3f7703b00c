//! End-to-end emission tests over the fixture device and design.

use crate::fixtures::{self, bel, bram_init_pattern, tile, T_CLBLM};
use crate::{write_fasm, EmitError};
use kiln_design::design::logic_slot;
use kiln_design::{CellInfo, ParamValue, BEL_FF, BEL_FF2};

fn emit_fixture() -> String {
    let dev = fixtures::build_device();
    let design = fixtures::build_design();
    fixtures::emit(&design, &dev)
}

#[test]
fn emission_is_deterministic() {
    let dev = fixtures::build_device();
    let design = fixtures::build_design();
    let first = fixtures::emit(&design, &dev);
    let second = fixtures::emit(&design, &dev);
    assert_eq!(first, second);
}

#[test]
fn no_consecutive_blank_lines() {
    let text = emit_fixture();
    assert!(!text.contains("\n\n\n"));
    assert!(!text.starts_with('\n'));
}

#[test]
fn lut_init_line() {
    let text = emit_fixture();
    let expected = format!(
        "CLBLL_L_X2Y10.SLICEL_X0.ALUT.INIT[63:0] = 64'b{}",
        "1111111100000000".repeat(4)
    );
    assert!(text.contains(&expected), "missing LUT INIT line in:\n{text}");
}

#[test]
fn ff_config_lines() {
    let text = emit_fixture();
    assert!(text.contains("CLBLM_L_X0Y0.SLICEM_X0.AFF.ZINI\n"));
    assert!(text.contains("CLBLM_L_X0Y0.SLICEM_X0.AFF.ZRST\n"));
    assert!(text.contains("CLBLM_L_X0Y0.SLICEM_X0.FFSYNC\n"));
    assert!(text.contains("CLBLM_L_X0Y0.SLICEM_X0.NOCLKINV\n"));
    assert!(text.contains("CLBLM_L_X0Y0.SLICEM_X0.SRUSEDMUX\n"));
    // CE is tied to the packer VCC net, so the CE mux stays at its default.
    assert!(!text.contains("CLBLM_L_X0Y0.SLICEM_X0.CEUSEDMUX"));
    assert!(!text.contains("CLBLM_L_X0Y0.SLICEM_X0.CLKINV"));
    assert!(!text.contains("CLBLM_L_X0Y0.SLICEM_X0.LATCH"));
}

#[test]
fn pseudo_pip_substitution() {
    let text = emit_fixture();
    let expected = "LIOI3_X0Y100.OLOGIC_Y0.OMUX.D1\n\
                    LIOI3_X0Y100.OLOGIC_Y0.OQUSED\n\
                    LIOI3_X0Y100.OLOGIC_Y0.OSERDES.DATA_RATE_TQ.BUF\n";
    assert!(text.contains(expected), "missing pseudo-PIP lines in:\n{text}");
    // The natural dst.src line must be fully replaced.
    assert!(!text.contains("LIOI3_X0Y100.LIOI_OLOGIC0_OQ"));
}

#[test]
fn sing_tile_flips_to_upper_site() {
    let text = emit_fixture();
    assert!(text.contains("LIOI3_SING_X0Y150.OLOGIC_Y1.OMUX.D1\n"));
    assert!(!text.contains("LIOI3_SING_X0Y150.OLOGIC_Y0."));
}

#[test]
fn bram_half_config() {
    let text = emit_fixture();
    assert!(text.contains("BRAM_L_X12Y40.RAMB18_Y1.IN_USE\n"));
    assert!(text.contains("BRAM_L_X12Y40.RAMB18_Y1.READ_WIDTH_A_18\n"));
    assert!(text.contains(&format!(
        "BRAM_L_X12Y40.RAMB18_Y1.ZINIT_A[17:0] = 18'b{}\n",
        "1".repeat(18)
    )));
    assert!(text.contains(&format!(
        "BRAM_L_X12Y40.RAMB18_Y1.INIT_00[255:0] = 256'b{}\n",
        bram_init_pattern()
    )));
    // The empty lower half contributes only the cascade defaults.
    assert!(!text.contains("BRAM_L_X12Y40.RAMB18_Y0.IN_USE"));
    assert!(!text.contains("CASCOUT_ARD_ACTIVE"));
}

#[test]
fn bram_inverted_pin_defaults() {
    let text = emit_fixture();
    assert!(text.contains("BRAM_L_X12Y40.RAMB18_Y1.ZINV_CLKARDCLK\n"));
    assert!(text.contains("BRAM_L_X12Y40.RAMB18_Y1.ZINV_RSTREGB\n"));
}

#[test]
fn bufgctrl_default_features() {
    let text = emit_fixture();
    let prefix = "CLK_BUFG_BOT_R_X3Y0.BUFGCTRL.BUFGCTRL_X0Y5";
    assert!(text.contains(&format!("{prefix}.IN_USE\n")));
    assert!(text.contains(&format!("{prefix}.ZINV_CE0\n")));
    assert!(text.contains(&format!("{prefix}.ZINV_CE1\n")));
    assert!(text.contains(&format!("{prefix}.ZINV_S0\n")));
    assert!(text.contains(&format!("{prefix}.ZINV_S1\n")));
    assert!(!text.contains(&format!("{prefix}.INIT_OUT")));
    assert!(!text.contains(&format!("{prefix}.IS_IGNORE0_INVERTED")));
}

#[test]
fn ilogic_through_idelay() {
    let text = emit_fixture();
    assert!(text.contains("LIOI3_X0Y100.ILOGIC_Y0.IDDR.IN_USE\n"));
    assert!(text.contains("LIOI3_X0Y100.ILOGIC_Y0.IFF.DDR_CLK_EDGE.SAME_EDGE\n"));
    assert!(text.contains("LIOI3_X0Y100.ILOGIC_Y0.IDELMUXE3.P0\n"));
    assert!(!text.contains("LIOI3_X0Y100.ILOGIC_Y0.IDELMUXE3.P1"));
}

#[test]
fn idelay_features() {
    let text = emit_fixture();
    assert!(text.contains("LIOI3_X0Y100.IDELAY_Y0.IN_USE\n"));
    assert!(text.contains("LIOI3_X0Y100.IDELAY_Y0.DELAY_SRC_IDATAIN\n"));
    assert!(text.contains("LIOI3_X0Y100.IDELAY_Y0.IDELAY_VALUE[4:0] = 5'b00000\n"));
    assert!(text.contains("LIOI3_X0Y100.IDELAY_Y0.ZIDELAY_VALUE[4:0] = 5'b11111\n"));
}

#[test]
fn sstl_input_pad_features() {
    let text = emit_fixture();
    assert!(text.contains("LIOB33_X0Y100.IOB_Y1.SSTL135_SSTL15.IN\n"));
    assert!(text
        .contains("LIOB33_X0Y100.IOB_Y1.LVCMOS12_LVCMOS15_LVCMOS18_SSTL135_SSTL15.STEPDOWN\n"));
    assert!(text.contains("LIOB33_X0Y100.IOB_Y1.PULLTYPE.NONE\n"));
    assert!(text.contains(
        "LIOB33_X0Y100.IOB_Y0.LVCMOS12_LVCMOS15_LVCMOS18_SSTL135_SSTL15.STEPDOWN\n"
    ));
}

#[test]
fn bank_aggregation_at_hclk() {
    let text = emit_fixture();
    assert_eq!(text.matches("HCLK_IOI3_X1Y99.VREF.V_675_MV\n").count(), 1);
    assert_eq!(text.matches("HCLK_IOI3_X1Y99.STEPDOWN\n").count(), 1);
    assert!(!text.contains("HCLK_IOI3_X1Y99.ONLY_DIFF_IN_USE"));
    assert!(!text.contains("HCLK_IOI3_X1Y99.TMDS_33_IN_USE"));
}

#[test]
fn clock_row_activation_and_rebuf() {
    let text = emit_fixture();
    assert!(text.contains(
        "CLK_HROW_TOP_R_X60Y130.CLK_HROW_CK_BUFHCLK_L0.CLK_HROW_R_CK_GCLK0\n"
    ));
    assert!(text.contains("CLK_HROW_TOP_R_X60Y130.CLK_HROW_R_CK_GCLK0_ACTIVE\n"));
    assert!(text.contains("CLK_BUFG_REBUF_X60Y140.GCLK0_ENABLE_ABOVE\n"));
    assert!(text.contains("CLK_BUFG_REBUF_X60Y140.GCLK0_ENABLE_BELOW\n"));
}

#[test]
fn dsp_default_features() {
    let text = emit_fixture();
    let prefix = "DSP_L_X10Y20.DSP48.DSP_0";
    assert!(text.contains(&format!("{prefix}.ZALUMODEREG[0]\n")));
    assert!(text.contains(&format!("{prefix}.ZIS_OPMODE_INVERTED[6]\n")));
    assert!(text.contains(&format!("{prefix}.ZIS_CLK_INVERTED\n")));
    assert!(text.contains(&format!("{prefix}.MASK[45:0] = 46'b{}\n", "1".repeat(46))));
    // Registered defaults carry no bit.
    assert!(!text.contains(&format!("{prefix}.ZCREG[0]")));
    assert!(!text.contains(&format!("{prefix}.ZADREG[0]")));
}

#[test]
fn bscan_jtag_chain() {
    let text = emit_fixture();
    assert!(text.contains("CFG_CENTER_MID_X52Y52.BSCAN.JTAG_CHAIN_2\n"));
}

#[test]
fn encoder_sections_emit_in_fixed_order() {
    let text = emit_fixture();
    let logic = text.find("ALUT.INIT").unwrap();
    let cfg = text.find("BSCAN.JTAG_CHAIN_2").unwrap();
    let io = text.find("SSTL135_SSTL15.IN").unwrap();
    let routing = text.find("OLOGIC_Y0.OMUX.D1").unwrap();
    let bram = text.find("RAMB18_Y1.IN_USE").unwrap();
    let clocking = text.find("BUFGCTRL_X0Y5.IN_USE").unwrap();
    let ip = text.find("DSP48.DSP_0").unwrap();
    assert!(logic < cfg && cfg < io && io < routing);
    assert!(routing < bram && bram < clocking && clocking < ip);
}

#[test]
#[should_panic(expected = "control-set mismatch")]
fn disagreeing_ffs_in_half_panic() {
    let dev = fixtures::build_device();
    let mut design = fixtures::build_design();

    let mut ff_a = CellInfo::new("ff_a", "SLICE_FF", bel(T_CLBLM, 0));
    ff_a.attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("FDRE"));
    design.add_cell(ff_a);
    design.set_logic_cell(tile(T_CLBLM), logic_slot(0, 1, BEL_FF), "ff_a");

    let mut ff_b = CellInfo::new("ff_b", "SLICE_FF", bel(T_CLBLM, 0));
    ff_b.attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("FDCE"));
    design.add_cell(ff_b);
    design.set_logic_cell(tile(T_CLBLM), logic_slot(0, 1, BEL_FF2), "ff_b");

    let _ = fixtures::emit(&design, &dev);
}

#[test]
fn unknown_ff_type_is_fatal() {
    let dev = fixtures::build_device();
    let mut design = fixtures::build_design();
    design
        .cells
        .get_mut("ff0")
        .unwrap()
        .attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("FDXX"));

    let mut out = Vec::new();
    let err = write_fasm(&design, &dev, &mut out).unwrap_err();
    match err {
        EmitError::UnsupportedCell { cell, detail } => {
            assert_eq!(cell, "ff0");
            assert!(detail.contains("FDXX"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn out_of_range_jtag_chain_is_fatal() {
    let dev = fixtures::build_device();
    let mut design = fixtures::build_design();
    design
        .cells
        .get_mut("bscan0")
        .unwrap()
        .params
        .insert("JTAG_CHAIN".into(), ParamValue::from(5));

    let mut out = Vec::new();
    let err = write_fasm(&design, &dev, &mut out).unwrap_err();
    assert!(matches!(err, EmitError::InvalidParam { .. }));
}

#[test]
fn write_to_unwritable_path_is_fatal() {
    let dev = fixtures::build_device();
    let design = fixtures::build_design();
    let err = crate::write_fasm_to_path(&design, &dev, "/nonexistent-dir/out.fasm").unwrap_err();
    assert!(matches!(err, EmitError::Io(_)));
}
