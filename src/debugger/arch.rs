//! Target architecture description used when compiling collection lists.

pub struct RegisterDescription {
    pub number: u16,
    pub name: &'static str,
    pub raw_size: u64,
}

impl RegisterDescription {
    const fn new(number: u16, name: &'static str, raw_size: u64) -> Self {
        Self {
            number,
            name,
            raw_size,
        }
    }
}

/// Static description of the remote register file.
///
/// Register numbering follows the numbers the remote stub understands (the
/// DWARF numbering on every supported target).
pub struct Arch {
    pub registers: &'static [RegisterDescription],
    /// Size of the dense register file collected by `$regs`.
    pub num_regs: u16,
    /// Frame pointer register, base of frame-relative collections.
    pub fp_regnum: u16,
    /// Coalesce threshold: two memranges separated by a gap not larger than
    /// this share one memory fetch on the target.
    pub max_register_virtual_size: u64,
}

impl Arch {
    pub fn register_by_name(&self, name: &str) -> Option<&RegisterDescription> {
        self.registers.iter().find(|r| r.name == name)
    }

    pub fn register_name(&self, number: u16) -> Option<&'static str> {
        self.registers
            .iter()
            .find_map(|r| (r.number == number).then_some(r.name))
    }

    pub fn reg_raw_size(&self, number: u16) -> u64 {
        self.registers
            .iter()
            .find_map(|r| (r.number == number).then_some(r.raw_size))
            .unwrap_or(8)
    }
}

const X86_64_REGISTERS: [RegisterDescription; 26] = [
    RegisterDescription::new(0, "rax", 8),
    RegisterDescription::new(1, "rdx", 8),
    RegisterDescription::new(2, "rcx", 8),
    RegisterDescription::new(3, "rbx", 8),
    RegisterDescription::new(4, "rsi", 8),
    RegisterDescription::new(5, "rdi", 8),
    RegisterDescription::new(6, "rbp", 8),
    RegisterDescription::new(7, "rsp", 8),
    RegisterDescription::new(8, "r8", 8),
    RegisterDescription::new(9, "r9", 8),
    RegisterDescription::new(10, "r10", 8),
    RegisterDescription::new(11, "r11", 8),
    RegisterDescription::new(12, "r12", 8),
    RegisterDescription::new(13, "r13", 8),
    RegisterDescription::new(14, "r14", 8),
    RegisterDescription::new(15, "r15", 8),
    RegisterDescription::new(16, "rip", 8),
    RegisterDescription::new(49, "eflags", 8),
    RegisterDescription::new(50, "es", 8),
    RegisterDescription::new(51, "cs", 8),
    RegisterDescription::new(52, "ss", 8),
    RegisterDescription::new(53, "ds", 8),
    RegisterDescription::new(54, "fs", 8),
    RegisterDescription::new(55, "gs", 8),
    RegisterDescription::new(58, "fs_base", 8),
    RegisterDescription::new(59, "gs_base", 8),
];

pub const X86_64: Arch = Arch {
    registers: &X86_64_REGISTERS,
    num_regs: 17,
    fp_regnum: 6,
    max_register_virtual_size: 8,
};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_lookup() {
        assert_eq!(X86_64.register_by_name("rbp").map(|r| r.number), Some(6));
        assert_eq!(X86_64.register_name(7), Some("rsp"));
        assert!(X86_64.register_by_name("cr3").is_none());
        assert_eq!(X86_64.reg_raw_size(0), 8);
    }
}
