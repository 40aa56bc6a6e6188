#![allow(non_camel_case_types)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown opcode mnemonic '{0}'")]
pub struct UnknownOpcode(pub String);

macro_rules! define_opcodes {
  ($($op:ident),* $(,)?) => {
    /// SASS opcode namespace shared by every supported generation.
    ///
    /// Variants are named after their mnemonic so `Opcode::HADD2_32I` prints
    /// and parses as `HADD2_32I`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(into = "&'static str", try_from = "String")]
    pub enum Opcode {
      $($op,)*
    }

    impl Opcode {
      /// Every opcode in declaration order, `ALL[op.index()] == op`.
      pub const ALL: &'static [Opcode] = &[$(Opcode::$op,)*];

      /// SASS mnemonic, e.g. `"FFMA"`.
      pub fn mnemonic(self) -> &'static str {
        match self {
          $(Opcode::$op => stringify!($op),)*
        }
      }

      fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        match mnemonic {
          $(stringify!($op) => Some(Opcode::$op),)*
          _ => None,
        }
      }
    }
  };
}

define_opcodes! {
  // floating point
  FADD, FADD32I, FCHK, FFMA32I, FFMA, FMNMX, FMUL, FMUL32I, FSEL, FSET, FSETP,
  FSWZADD, MUFU, HADD2, HADD2_32I, HFMA2, HFMA2_32I, HMUL2, HMUL2_32I, HSET2,
  HSETP2, HMMA, DADD, DFMA, DMUL, DSETP,
  // integer
  BMSK, BREV, FLO, IABS, IADD, IADD3, IADD32I, IDP, IDP4A, IMAD, IMMA, IMNMX,
  IMUL, IMUL32I, ISCADD, ISCADD32I, ISETP, LEA, LOP, LOP3, LOP32I, POPC, SHF,
  SHR, VABSDIFF, VABSDIFF4,
  // conversion
  F2F, F2FP, F2I, I2F, I2I, I2IP, FRND,
  // movement and predicates
  MOV, MOV32I, PRMT, SEL, SGXT, SHFL, PLOP3, PSETP, P2R, R2P,
  // memory
  LD, LDC, LDG, LDL, LDS, ST, STG, STL, STS, MATCH, QSPC, ATOM, ATOMS, ATOMG,
  RED, CCTL, CCTLL, ERRBAR, MEMBAR, CCTLT,
  // texture
  TEX, TLD, TLD4, TMML, TXD, TXQ,
  // control
  BMOV, BPT, BRA, BREAK, BRX, BSSY, BSYNC, CALL, EXIT, JMP, JMX, KILL,
  NANOSLEEP, RET, RPCMOV, RTT, WARPSYNC, YIELD,
  // miscellaneous
  B2R, BAR, CS2R, CSMTEST, DEPBAR, GETLMEMBASE, LEPC, NOP, PMTRIG, R2B, S2R,
  SETCTAID, SETLMEMBASE, VOTE, VOTE_VTG,
  // pascal
  RRO, DMNMX, DSET, BFE, BFI, ICMP, IMADSP, SHL, XMAD, CSET, CSETP, TEXS,
  TLD4S, TLDS, CAL, JCAL, PRET, BRK, PBK, CONT, PCNT, PEXIT, SSY, SYNC, PSET,
  VMNMX, ISET,
  // turing
  BMMA, MOVM, LDSM, R2UR, S2UR, UBMSK, UBREV, UCLEA, UFLO, UIADD3, UIMAD,
  UISETP, ULDC, ULEA, ULOP, ULOP3, ULOP32I, UMOV, UP2UR, UPLOP3, UPOPC, UPRMT,
  UPSETP, UR2UP, USEL, USGXT, USHF, USHL, USHR, VOTEU, SUATOM, SULD, SURED,
  SUST, BRXU, JMXU,
  // kepler
  FCMP, FSWZ, ISAD, LDSLK, STSCUL, SUCLAMP, SUBFM, SUEAU, SULDGA, SUSTGA, ISUB,
  // ampere
  HMNMX2, DMMA, I2FP, F2IP, LDGDEPBAR, LDGSTS, REDUX, UF2FP, SUQUERY,
  // graphics pipeline, decoded but never power-mapped
  AL2P, ALD, AST, IPA, ISBERD, OUT, PIXLD,
}

impl Opcode {
  pub const COUNT: usize = Opcode::ALL.len();

  /// Dense index in `0..Opcode::COUNT`.
  pub fn index(self) -> usize {
    self as usize
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.mnemonic())
  }
}

/// Accepts `FADD`, `fadd` and `OP_FADD`.
impl FromStr for Opcode {
  type Err = UnknownOpcode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let upper = s.trim().to_ascii_uppercase();
    let mnemonic = upper.strip_prefix("OP_").unwrap_or(&upper);
    Opcode::from_mnemonic(mnemonic).ok_or_else(|| UnknownOpcode(s.to_string()))
  }
}

impl From<Opcode> for &'static str {
  fn from(op: Opcode) -> Self {
    op.mnemonic()
  }
}

impl TryFrom<String> for Opcode {
  type Error = UnknownOpcode;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}
