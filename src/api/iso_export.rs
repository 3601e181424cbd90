//! ISO 20022 pain.001.001.03 export
//!
//! Fixed single-transfer document with the wallet as debtor. Demo export,
//! not a payment order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const CREDITOR_NAME: &str = "Compliance Receiver";
const CREDITOR_ID: &str = "rComplianceReceiverXXXXXXXXXXXXXXX";

/// Escape the five XML special characters
pub fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn short_id(prefix: &str, len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..len])
}

/// Amount with 6 decimals; non-finite values export as zero
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.6}", amount)
    } else {
        "0.000000".to_string()
    }
}

/// Download file name for a wallet export
pub fn export_filename(wallet: &str) -> String {
    format!("pain001_{}.xml", wallet)
}

/// Build the document for `wallet` with `balance_xrp` as the instructed amount
pub fn generate_iso20022_xml(wallet: &str, balance_xrp: f64) -> String {
    generate_at(wallet, balance_xrp, Utc::now())
}

fn generate_at(wallet: &str, balance_xrp: f64, now: DateTime<Utc>) -> String {
    let msg_id = short_id("PX", 12);
    let e2e_id = short_id("E2E", 12);
    let pmt_inf_id = short_id("PMT", 10);
    let created = now.format("%Y-%m-%dT%H:%M:%SZ");
    let exec_date = now.format("%Y-%m-%d");
    let amount = format_amount(balance_xrp);
    let wallet_name = xml_escape(&format!("XRPL Wallet {}", wallet));
    let wallet_id = xml_escape(wallet);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.03">
  <CstmrCdtTrfInitn>
    <GrpHdr>
      <MsgId>{msg_id}</MsgId>
      <CreDtTm>{created}</CreDtTm>
      <NbOfTxs>1</NbOfTxs>
      <CtrlSum>{amount}</CtrlSum>
      <InitgPty>
        <Nm>{wallet_name}</Nm>
      </InitgPty>
    </GrpHdr>
    <PmtInf>
      <PmtInfId>{pmt_inf_id}</PmtInfId>
      <PmtMtd>TRF</PmtMtd>
      <BtchBookg>false</BtchBookg>
      <NbOfTxs>1</NbOfTxs>
      <CtrlSum>{amount}</CtrlSum>
      <PmtTpInf>
        <SvcLvl>
          <Cd>SEPA</Cd>
        </SvcLvl>
      </PmtTpInf>
      <ReqdExctnDt>{exec_date}</ReqdExctnDt>
      <Dbtr>
        <Nm>{wallet_name}</Nm>
      </Dbtr>
      <DbtrAcct>
        <Id>
          <Othr>
            <Id>{wallet_id}</Id>
            <SchmeNm>
              <Prtry>XRPL</Prtry>
            </SchmeNm>
          </Othr>
        </Id>
      </DbtrAcct>
      <DbtrAgt>
        <FinInstnId>
          <Othr>
            <Id>XRPL</Id>
          </Othr>
        </FinInstnId>
      </DbtrAgt>
      <ChrgBr>SLEV</ChrgBr>
      <CdtTrfTxInf>
        <PmtId>
          <EndToEndId>{e2e_id}</EndToEndId>
        </PmtId>
        <Amt>
          <InstdAmt Ccy="XRP">{amount}</InstdAmt>
        </Amt>
        <CdtrAgt>
          <FinInstnId>
            <Othr>
              <Id>XRPL</Id>
            </Othr>
          </FinInstnId>
        </CdtrAgt>
        <Cdtr>
          <Nm>{CREDITOR_NAME}</Nm>
        </Cdtr>
        <CdtrAcct>
          <Id>
            <Othr>
              <Id>{CREDITOR_ID}</Id>
              <SchmeNm>
                <Prtry>XRPL</Prtry>
              </SchmeNm>
            </Othr>
          </Id>
        </CdtrAcct>
        <RmtInf>
          <Ustrd>PX export (demo) - not a payment order</Ustrd>
        </RmtInf>
      </CdtTrfTxInf>
    </PmtInf>
  </CstmrCdtTrfInitn>
</Document>"#
    )
}
