//! Canonical SASS opcode to power component mapping used by AccelWattch.

use crate::isa::Generation;
use crate::isa::Opcode::{self, *};
use crate::mapping::spec::{EntryGroup, MappingSpec};
use crate::power::PowerComponent::{self, *};

/// Canonical mapping, one group per generation, Volta first.
pub fn canonical_spec() -> MappingSpec {
  MappingSpec::new()
    .with_group(EntryGroup::new(Generation::Volta, "volta").with_entries(VOLTA))
    .with_group(EntryGroup::new(Generation::Pascal, "pascal").with_entries(PASCAL))
    .with_group(EntryGroup::new(Generation::Turing, "turing").with_entries(TURING))
    .with_group(EntryGroup::new(Generation::Kepler, "kepler").with_entries(KEPLER))
    .with_group(EntryGroup::new(Generation::Ampere, "ampere").with_entries(AMPERE))
}

/// Volta instruction set, which also carries the instructions common to every
/// later card.
pub const VOLTA: &[(Opcode, PowerComponent)] = &[
  (FADD, Fp),
  (FADD32I, Fp),
  (FCHK, Fp),
  (FFMA32I, FpMul),
  (FFMA, FpMul),
  (FMNMX, Fp),
  (FMUL, FpMul),
  (FMUL32I, FpMul),
  (FSEL, Fp),
  (FSET, Fp),
  (FSETP, Fp),
  (FSWZADD, Fp),
  // SIN, EX2, RSQ and LG2 all share one entry
  (MUFU, FpSin),
  (HADD2, Fp),
  (HADD2_32I, Fp),
  (HFMA2, FpMul),
  (HFMA2_32I, FpMul),
  (HMUL2, FpMul),
  (HMUL2_32I, FpMul),
  (HSET2, Fp),
  (HSETP2, Fp),
  (HMMA, Tensor),
  (DADD, Dp),
  (DFMA, DpMul),
  (DMUL, DpMul),
  (DSETP, Dp),
  (BMSK, Int),
  (BREV, Int),
  (FLO, Int),
  (IABS, Int),
  (IADD, Int),
  (IADD3, Int),
  (IADD32I, Int),
  (IDP, IntMul),
  (IDP4A, IntMul),
  (IMAD, IntMul),
  (IMMA, Tensor),
  (IMNMX, Int),
  (IMUL, IntMul),
  (IMUL32I, IntMul),
  (ISCADD, IntMul),
  (ISCADD32I, IntMul),
  (ISETP, Int),
  (LEA, IntMul),
  (LOP, Int),
  (LOP3, Int),
  (LOP32I, Int),
  (POPC, Int),
  (SHF, Int),
  (SHR, Int),
  (VABSDIFF, Int),
  (VABSDIFF4, Int),
  (F2F, Fp),
  (F2FP, Fp),
  (F2I, Fp),
  (I2F, Fp),
  (I2I, Int),
  (I2IP, Int),
  (FRND, Int),
  (MOV, Int),
  (MOV32I, Int),
  (PRMT, Int),
  (SEL, Int),
  (SGXT, Int),
  (SHFL, Int),
  (PLOP3, Int),
  (PSETP, Int),
  (P2R, Int),
  (R2P, Int),
  (LD, Other),
  (LDC, Other),
  (LDG, Other),
  (LDL, Other),
  (LDS, Other),
  (ST, Other),
  (STG, Other),
  (STL, Other),
  (STS, Other),
  (MATCH, Other),
  (QSPC, Other),
  (ATOM, Other),
  (ATOMS, Other),
  (ATOMG, Other),
  (RED, Other),
  (CCTL, Other),
  (CCTLL, Other),
  (ERRBAR, Other),
  (MEMBAR, Other),
  (CCTLT, Other),
  (TEX, Tex),
  (TLD, Tex),
  (TLD4, Tex),
  (TMML, Tex),
  (TXD, Tex),
  (TXQ, Tex),
  (BMOV, Other),
  (BPT, Other),
  (BRA, Other),
  (BREAK, Other),
  (BRX, Other),
  (BSSY, Other),
  (BSYNC, Other),
  (CALL, Other),
  (EXIT, Other),
  (JMP, Other),
  (JMX, Other),
  (KILL, Other),
  (NANOSLEEP, Other),
  (RET, Other),
  (RPCMOV, Other),
  (RTT, Other),
  (WARPSYNC, Other),
  (YIELD, Other),
  (B2R, Other),
  (BAR, Other),
  (CS2R, Int),
  (CSMTEST, Other),
  (DEPBAR, Other),
  (GETLMEMBASE, Other),
  (LEPC, Other),
  (NOP, Other),
  (PMTRIG, Other),
  (R2B, Other),
  (S2R, Other),
  (SETCTAID, Other),
  (SETLMEMBASE, Other),
  (VOTE, Other),
  (VOTE_VTG, Other),
];

/// Instructions unique to Pascal.
pub const PASCAL: &[(Opcode, PowerComponent)] = &[
  (RRO, Fp),
  (DMNMX, Dp),
  (DSET, Dp),
  (BFE, Int),
  (BFI, Int),
  (ICMP, Int),
  (IMADSP, IntMul),
  (SHL, Int),
  (XMAD, IntMul),
  (CSET, Int),
  (CSETP, Int),
  (TEXS, Tex),
  (TLD4S, Tex),
  (TLDS, Tex),
  (CAL, Other),
  (JCAL, Other),
  (PRET, Other),
  (BRK, Other),
  (PBK, Other),
  (CONT, Other),
  (PCNT, Other),
  (PEXIT, Other),
  (SSY, Other),
  (SYNC, Other),
  (PSET, Int),
  (VMNMX, Int),
  (ISET, Int),
];

/// Instructions unique to Turing, mostly the uniform datapath.
pub const TURING: &[(Opcode, PowerComponent)] = &[
  (BMMA, Tensor),
  (MOVM, Int),
  (LDSM, Other),
  (R2UR, Int),
  (S2UR, Int),
  (UBMSK, Int),
  (UBREV, Int),
  (UCLEA, IntMul),
  (UFLO, Int),
  (UIADD3, Int),
  (UIMAD, IntMul),
  (UISETP, Int),
  (ULDC, Other),
  (ULEA, Int),
  (ULOP, Int),
  (ULOP3, Int),
  (ULOP32I, Int),
  (UMOV, Int),
  (UP2UR, Int),
  (UPLOP3, Int),
  (UPOPC, Int),
  (UPRMT, Int),
  (UPSETP, Int),
  (UR2UP, Int),
  (USEL, Int),
  (USGXT, Int),
  (USHF, Int),
  (USHL, Int),
  (USHR, Int),
  (VOTEU, Int),
  (SUATOM, Other),
  (SULD, Other),
  (SURED, Other),
  (SUST, Other),
  (BRXU, Other),
  (JMXU, Other),
];

/// Instructions unique to Kepler.
pub const KEPLER: &[(Opcode, PowerComponent)] = &[
  (FCMP, Fp),
  (FSWZ, Fp),
  (ISAD, Int),
  (LDSLK, Other),
  (STSCUL, Other),
  (SUCLAMP, Other),
  (SUBFM, Other),
  (SUEAU, Other),
  (SULDGA, Other),
  (SUSTGA, Other),
  (ISUB, Int),
];

/// Instructions unique to Ampere.
pub const AMPERE: &[(Opcode, PowerComponent)] = &[
  (HMNMX2, Fp),
  (DMMA, Tensor),
  (I2FP, Fp),
  (F2IP, Fp),
  (LDGDEPBAR, Other),
  (LDGSTS, Other),
  (REDUX, Int),
  (UF2FP, Fp),
  (SUQUERY, Other),
];
