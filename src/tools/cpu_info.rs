use sysinfo::System;

/// 邏輯 CPU 數量，取不到時回傳 1
#[must_use]
pub fn logical_cpu_count() -> usize {
    let mut system = System::new();
    system.refresh_cpu_all();
    system.cpus().len().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_cpu_count_positive() {
        assert!(logical_cpu_count() >= 1);
    }
}
