//! Modulo per il monitoraggio delle risorse del processo server
//!
//! Espone una misura puntuale della memoria usata **dal processo corrente**
//! (il binario del bot). La misurazione è basata su `sysinfo` e non raccoglie
//! la media globale della macchina (scopo: isolare il consumo del processo
//! dell'applicazione). Il valore finisce nel pannello amministratore insieme
//! alle statistiche sui download.

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Memoria residente del processo corrente in megabyte.
///
/// Se il processo non è visibile a `sysinfo` restituisce 0.0 invece di
/// fallire: il pannello admin mostra comunque il resto delle statistiche.
pub fn process_memory_mb() -> f64 {
    let mut sys = System::new();
    let current_pid = Pid::from_u32(std::process::id());
    sys.refresh_processes(ProcessesToUpdate::Some(&[current_pid]), true);

    sys.process(current_pid)
        .map(|process| process.memory() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}
