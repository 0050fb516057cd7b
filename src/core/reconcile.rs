use crate::core::primary::PrimaryCourtStream;
use crate::domain::model::{AddressMap, CourtRecord, SecondaryCourtSet};
use crate::domain::ports::ReconcileMode;

/// 次要來源找不到時的旗標值
pub const ABSENT_FLAG: &str = "Нет";
/// presence-marker 模式下命中的旗標值
pub const PRESENT_FLAG: &str = "Да";

/// 以代碼查地址；沒有代碼或查無資料時原樣通過
pub fn attach_address(mut record: CourtRecord, addresses: &AddressMap) -> CourtRecord {
    if let Some(address) = record.code.as_deref().and_then(|code| addresses.get(code)) {
        record.address = Some(address.clone());
    }
    record
}

/// 依模式設定 presence 旗標；address-only 模式不動旗標
pub fn mark_presence(
    mut record: CourtRecord,
    secondary: &SecondaryCourtSet,
    mode: ReconcileMode,
) -> CourtRecord {
    let matched = secondary.lookup(record.code.as_deref());
    record.presence_flag = match (mode, matched) {
        (ReconcileMode::AddressOnly, _) => record.presence_flag,
        (_, None) => Some(ABSENT_FLAG.to_string()),
        (ReconcileMode::PresenceCode, Some(court)) => court.code.clone(),
        (ReconcileMode::PresenceMarker, Some(_)) => Some(PRESENT_FLAG.to_string()),
    };
    record
}

/// 單筆記錄的完整合併：先補地址，再標記是否存在於次要來源
pub fn reconcile_record(
    record: CourtRecord,
    addresses: &AddressMap,
    secondary: Option<&SecondaryCourtSet>,
    mode: ReconcileMode,
) -> CourtRecord {
    let record = attach_address(record, addresses);
    match secondary {
        Some(secondary) if mode.needs_secondary() => mark_presence(record, secondary, mode),
        _ => record,
    }
}

/// 拉取式的合併串流，輸出順序與主站串流一致
pub struct Reconciler<'a> {
    primary: PrimaryCourtStream<'a>,
    addresses: &'a AddressMap,
    secondary: Option<&'a SecondaryCourtSet>,
    mode: ReconcileMode,
}

impl<'a> Reconciler<'a> {
    pub fn address_only(primary: PrimaryCourtStream<'a>, addresses: &'a AddressMap) -> Self {
        Self {
            primary,
            addresses,
            secondary: None,
            mode: ReconcileMode::AddressOnly,
        }
    }

    pub fn with_presence(
        primary: PrimaryCourtStream<'a>,
        addresses: &'a AddressMap,
        secondary: &'a SecondaryCourtSet,
        mode: ReconcileMode,
    ) -> Self {
        Self {
            primary,
            addresses,
            secondary: Some(secondary),
            mode,
        }
    }

    pub fn failed_regions(&self) -> usize {
        self.primary.failed_regions()
    }

    pub async fn next_record(&mut self) -> Option<CourtRecord> {
        let record = self.primary.next_record().await?;
        Some(reconcile_record(
            record,
            self.addresses,
            self.secondary,
            self.mode,
        ))
    }
}
