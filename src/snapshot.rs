use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::instruction::REGISTER_NAMES;
use crate::{Cpu, Status};

/// Final architectural state of a machine, shaped for stable structured
/// output: `PC`, `REG`, `CC`, `MEM`, `STAT`, in that order, with no YAML
/// aliases and plain decimal integers throughout.
#[derive(Debug, Serialize)]
pub struct CpuState {
    #[serde(rename = "PC")]
    pub pc: u64,
    #[serde(rename = "REG")]
    pub reg: RegisterMap,
    #[serde(rename = "CC")]
    pub cc: ConditionCodes,
    #[serde(rename = "MEM")]
    pub mem: MemoryMap,
    #[serde(rename = "STAT")]
    pub stat: u8,
}

/// All fifteen registers, serialized as a map in canonical register order
/// so every register is present even when zero.
#[derive(Debug)]
pub struct RegisterMap(Vec<(&'static str, i64)>);

impl RegisterMap {
    fn from_registers(registers: &[u64; 15]) -> Self {
        let pairs = REGISTER_NAMES
            .iter()
            .zip(registers.iter())
            .map(|(&name, &value)| (name, value as i64))
            .collect();
        RegisterMap(pairs)
    }

    pub fn get(&self, name: &str) -> Option<&i64> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

impl Serialize for RegisterMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct ConditionCodes {
    #[serde(rename = "ZF")]
    pub zf: u8,
    #[serde(rename = "SF")]
    pub sf: u8,
    #[serde(rename = "OF")]
    pub of: u8,
}

/// Non-zero memory, grouped into aligned 8-byte blocks and sorted by
/// address, each block read little-endian and reinterpreted as a signed
/// 64-bit integer.
#[derive(Debug)]
pub struct MemoryMap(Vec<(u64, i64)>);

impl MemoryMap {
    fn from_cpu_memory(memory: &crate::Memory) -> Self {
        let mut blocks: HashMap<u64, u64> = HashMap::new();
        for (addr, byte) in memory.nonzero_snapshot() {
            let base = addr - (addr % 8);
            let offset = addr - base;
            *blocks.entry(base).or_insert(0) |= (byte as u64) << (offset * 8);
        }

        let mut pairs: Vec<(u64, i64)> = blocks.into_iter().map(|(a, v)| (a, v as i64)).collect();
        pairs.sort_by_key(|&(addr, _)| addr);
        MemoryMap(pairs)
    }

    pub fn get(&self, addr: u64) -> Option<i64> {
        self.0
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
    }
}

impl Serialize for MemoryMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (addr, value) in &self.0 {
            map.serialize_entry(addr, value)?;
        }
        map.end()
    }
}

pub(crate) fn build(cpu: &Cpu) -> CpuState {
    CpuState {
        pc: cpu.pc,
        reg: RegisterMap::from_registers(&cpu.registers),
        cc: ConditionCodes {
            zf: cpu.zf as u8,
            sf: cpu.sf as u8,
            of: cpu.of as u8,
        },
        mem: MemoryMap::from_cpu_memory(&cpu.memory),
        stat: if cpu.status == Status::Hlt { 1 } else { 2 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_map_lists_all_fifteen_registers_even_when_zero() {
        let registers = [0u64; 15];
        let map = RegisterMap::from_registers(&registers);
        assert_eq!(map.get("rax"), Some(&0));
        assert_eq!(map.get("r14"), Some(&0));
        assert_eq!(map.get("rsp"), Some(&0));
    }

    #[test]
    fn memory_map_aligns_a_single_byte_write_to_its_block() {
        let mut memory = crate::Memory::new();
        memory.write_byte(0x103, 0xFF);
        let map = MemoryMap::from_cpu_memory(&memory);
        assert_eq!(map.get(0x100), Some(0xFF << 24));
    }

    #[test]
    fn snapshot_stat_is_one_on_halt_and_two_otherwise() {
        let mut cpu = Cpu::new();
        cpu.status = Status::Hlt;
        assert_eq!(build(&cpu).stat, 1);
        cpu.status = Status::Ins;
        assert_eq!(build(&cpu).stat, 2);
    }

    #[test]
    fn serializes_to_yaml_with_fields_in_canonical_order() {
        let mut cpu = Cpu::new();
        cpu.registers[0] = 5;
        cpu.status = Status::Hlt;
        let state = build(&cpu);
        let yaml = serde_yaml::to_string(&state).unwrap();
        let pc_pos = yaml.find("PC:").unwrap();
        let reg_pos = yaml.find("REG:").unwrap();
        let cc_pos = yaml.find("CC:").unwrap();
        let mem_pos = yaml.find("MEM:").unwrap();
        let stat_pos = yaml.find("STAT:").unwrap();
        assert!(pc_pos < reg_pos);
        assert!(reg_pos < cc_pos);
        assert!(cc_pos < mem_pos);
        assert!(mem_pos < stat_pos);
    }
}
