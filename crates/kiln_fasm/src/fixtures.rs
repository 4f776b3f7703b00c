//! Hand-built device and design fixtures for emission tests.
//!
//! The fixture device is a single-row grid with one tile of each kind the
//! encoders care about; the fixture design places one representative cell
//! of each kind and routes a couple of nets over interesting PIPs.

use kiln_common::BitVec;
use kiln_design::design::logic_slot;
use kiln_design::{
    CellInfo, Design, NetInfo, ParamValue, PortRef, BEL_6LUT, BEL_FF, BEL_RAM18_U,
};
use kiln_device::{
    BelData, Device, PipData, SiteInst, Tile, TileId, TileTypeData, WireData, WireId,
};

pub const T_CLBLL: u32 = 0;
pub const T_CLBLM: u32 = 1;
pub const T_LIOI3: u32 = 2;
pub const T_HCLK_IOI: u32 = 3;
pub const T_LIOB33: u32 = 4;
pub const T_BRAM: u32 = 5;
pub const T_CLK_BUFG: u32 = 6;
pub const T_DSP: u32 = 7;
pub const T_CFG: u32 = 8;
pub const T_CLK_HROW: u32 = 9;
pub const T_LIOI3_SING: u32 = 11;
pub const T_HCLK_IOI_TOP: u32 = 12;

pub fn tile(raw: u32) -> TileId {
    TileId::from_raw(raw)
}

pub fn bel(tile_raw: u32, index: u32) -> kiln_device::BelId {
    kiln_device::BelId::new(tile(tile_raw), index)
}

pub fn build_device() -> Device {
    let clbll = TileTypeData::new("CLBLL_L");

    let mut clblm = TileTypeData::new("CLBLM_L");
    clblm.bels.push(BelData::new("AFF", 0, vec![]));

    let mut lioi3 = TileTypeData::new("LIOI3");
    lioi3.wires.push(WireData::fabric("LIOI_OLOGIC0_OQ"));
    lioi3.wires.push(WireData::fabric("IOI_OLOGIC0_D1"));
    lioi3.pips.push(PipData::routing(1, 0));
    lioi3.bels.push(BelData::new("ILOGIC0", 0, vec![]));
    lioi3.bels.push(BelData::new("IDELAY0", 1, vec![]));

    let hclk_ioi = TileTypeData::new("HCLK_IOI3");

    let mut liob33 = TileTypeData::new("LIOB33");
    liob33.bels.push(BelData::new("PAD", 0, vec![]));
    liob33.bels.push(BelData::new("INBUF_EN", 0, vec![]));

    let mut bram = TileTypeData::new("BRAM_L");
    bram.bels.push(BelData::new("RAMB18E1", 0, vec![]));

    let mut clk_bufg = TileTypeData::new("CLK_BUFG_BOT_R");
    clk_bufg.bels.push(BelData::new("BUFGCTRL", 0, vec![]));

    let mut dsp = TileTypeData::new("DSP_L");
    dsp.bels.push(BelData::new("DSP48E1", 0, vec![]));

    let mut cfg = TileTypeData::new("CFG_CENTER_MID");
    cfg.bels.push(BelData::new("BSCAN", 0, vec![]));

    let mut clk_hrow = TileTypeData::new("CLK_HROW_TOP_R");
    clk_hrow.wires.push(WireData::fabric("CLK_HROW_R_CK_GCLK0"));
    clk_hrow
        .wires
        .push(WireData::fabric("CLK_HROW_CK_BUFHCLK_L0"));
    clk_hrow.pips.push(PipData::routing(0, 1));

    let rebuf = TileTypeData::new("CLK_BUFG_REBUF");

    let mut lioi3_sing = TileTypeData::new("LIOI3_SING");
    lioi3_sing.wires.push(WireData::fabric("LIOI_OLOGIC0_OQ"));
    lioi3_sing.wires.push(WireData::fabric("IOI_OLOGIC0_D1"));
    lioi3_sing.pips.push(PipData::routing(1, 0));

    let tile_types = vec![
        clbll, clblm, lioi3, hclk_ioi, liob33, bram, clk_bufg, dsp, cfg, clk_hrow, rebuf,
        lioi3_sing,
    ];

    let tiles = vec![
        Tile::new("CLBLL_L_X2Y10", 0, vec![SiteInst::new("SLICE_X4Y10", 0, 0)]),
        Tile::new("CLBLM_L_X0Y0", 1, vec![SiteInst::new("SLICE_X0Y0", 0, 0)]),
        Tile::new(
            "LIOI3_X0Y100",
            2,
            vec![
                SiteInst::new("ILOGIC_X0Y1", 0, 1),
                SiteInst::new("IDELAY_X0Y1", 0, 1),
            ],
        ),
        Tile::new("HCLK_IOI3_X1Y99", 3, vec![]),
        Tile::new("LIOB33_X0Y100", 4, vec![SiteInst::new("IOB_X0Y100", 0, 0)]),
        Tile::new("BRAM_L_X12Y40", 5, vec![SiteInst::new("RAMB18_X0Y16", 0, 0)]),
        Tile::new(
            "CLK_BUFG_BOT_R_X3Y0",
            6,
            vec![SiteInst::new("BUFGCTRL_X0Y5", 0, 5)],
        ),
        Tile::new("DSP_L_X10Y20", 7, vec![SiteInst::new("DSP48_X0Y8", 0, 0)]),
        Tile::new(
            "CFG_CENTER_MID_X52Y52",
            8,
            vec![SiteInst::new("BSCAN_X0Y0", 0, 0)],
        ),
        Tile::new("CLK_HROW_TOP_R_X60Y130", 9, vec![]),
        Tile::new("CLK_BUFG_REBUF_X60Y140", 10, vec![]),
        Tile::new("LIOI3_SING_X0Y150", 11, vec![]),
        Tile::new("HCLK_IOI3_X1Y149", 3, vec![]),
    ];

    let mut dev = Device::new("xc7a35t", tile_types, tiles, 13);
    dev.set_io_hclk(tile(T_LIOI3), tile(T_HCLK_IOI));
    dev.set_io_hclk(tile(T_LIOB33), tile(T_HCLK_IOI));
    dev.set_io_hclk(tile(T_LIOI3_SING), tile(T_HCLK_IOI_TOP));
    dev
}

/// 256-bit BRAM init pattern used by the fixture design.
pub fn bram_init_pattern() -> BitVec {
    let mut bits = BitVec::new(256);
    for i in 0..256 {
        if i % 3 == 0 {
            bits.set(i, true);
        }
    }
    bits
}

pub fn build_design() -> Design {
    let mut design = Design::new();

    // Fractured-LUT-capable eighth-tile holding a LUT2 whose two logical
    // inputs are both fed from physical pin A4.
    let mut lut = CellInfo::new("lut0", "SLICE_LUT6", bel(T_CLBLL, 0));
    lut.attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("LUT2"));
    lut.attrs
        .insert("X_ORIG_PORT_A4".into(), ParamValue::from("I0 I1"));
    lut.params.insert("INIT".into(), ParamValue::from("1000"));
    design.add_cell(lut);
    design.set_logic_cell(tile(T_CLBLL), logic_slot(0, 0, BEL_6LUT), "lut0");

    let mut ff = CellInfo::new("ff0", "SLICE_FF", bel(T_CLBLM, 0));
    ff.attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("FDRE"));
    ff.params.insert("INIT".into(), ParamValue::from(0));
    ff.ports.insert("SR".into(), Some("rst".into()));
    ff.ports.insert("CE".into(), Some("$PACKER_VCC_NET".into()));
    design.add_cell(ff);
    design.set_logic_cell(tile(T_CLBLM), logic_slot(0, 0, BEL_FF), "ff0");

    let mut ilogic = CellInfo::new("ilogic0", "ILOGICE3_IFF", bel(T_LIOI3, 0));
    ilogic
        .params
        .insert("DDR_CLK_EDGE".into(), ParamValue::from("SAME_EDGE"));
    ilogic.ports.insert("D".into(), Some("dly".into()));
    design.add_cell(ilogic);

    let idelay = CellInfo::new("idelay0", "IDELAYE2_IDELAYE2", bel(T_LIOI3, 1));
    design.add_cell(idelay);

    let mut pad = CellInfo::new("pad0", "PAD", bel(T_LIOB33, 0));
    pad.attrs
        .insert("IOSTANDARD".into(), ParamValue::from("SSTL135"));
    pad.ports.insert("PAD".into(), Some("padnet".into()));
    design.add_cell(pad);

    let ibuf = CellInfo::new("ibuf0", "INBUF_EN", bel(T_LIOB33, 1));
    design.add_cell(ibuf);

    let mut bram = CellInfo::new("bram0", "RAMB18E1_RAMB18E1", bel(T_BRAM, 0));
    bram.attrs
        .insert("X_ORIG_TYPE".into(), ParamValue::from("RAMB18E1"));
    bram.params
        .insert("READ_WIDTH_A".into(), ParamValue::from(18));
    bram.params
        .insert("INIT_00".into(), ParamValue::from(bram_init_pattern()));
    design.add_cell(bram);
    design.set_bram_cell(tile(T_BRAM), BEL_RAM18_U, "bram0");

    let bufg = CellInfo::new("bufg0", "BUFGCTRL", bel(T_CLK_BUFG, 0));
    design.add_cell(bufg);

    let dsp = CellInfo::new("dsp0", "DSP48E1_DSP48E1", bel(T_DSP, 0));
    design.add_cell(dsp);

    let mut bscan = CellInfo::new("bscan0", "BSCAN", bel(T_CFG, 0));
    bscan.params.insert("JTAG_CHAIN".into(), ParamValue::from(2));
    design.add_cell(bscan);

    design.add_net(NetInfo::new("rst"));
    design.add_net(NetInfo::new("$PACKER_VCC_NET"));

    let mut dly = NetInfo::new("dly");
    dly.driver = Some(PortRef::new("idelay0", "DATAOUT"));
    dly.users.push(PortRef::new("ilogic0", "D"));
    design.add_net(dly);

    let mut padnet = NetInfo::new("padnet");
    padnet.users.push(PortRef::new("ibuf0", "I"));
    design.add_net(padnet);

    // Output path routed through the OLOGIC data-path pseudo-PIP.
    let mut sig_o = NetInfo::new("sig_o");
    sig_o.wires.insert(
        WireId::new(tile(T_LIOI3), 0),
        Some(kiln_device::PipId::new(tile(T_LIOI3), 0)),
    );
    design.add_net(sig_o);

    // The same pseudo-PIP in a single-height tile above its HCLK.
    let mut sig_sing = NetInfo::new("sig_sing");
    sig_sing.wires.insert(
        WireId::new(tile(T_LIOI3_SING), 0),
        Some(kiln_device::PipId::new(tile(T_LIOI3_SING), 0)),
    );
    design.add_net(sig_sing);

    // A global clock entering the clock row.
    let mut clknet = NetInfo::new("clknet");
    clknet.wires.insert(
        WireId::new(tile(T_CLK_HROW), 1),
        Some(kiln_device::PipId::new(tile(T_CLK_HROW), 0)),
    );
    design.add_net(clknet);

    design
}

/// Runs a full emission over the fixture pair and returns the text.
pub fn emit(design: &Design, dev: &Device) -> String {
    let mut out = Vec::new();
    crate::write_fasm(design, dev, &mut out).expect("emission failed");
    String::from_utf8(out).unwrap()
}
