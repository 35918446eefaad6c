mod common;

use anyhow::Result;
use common::{Campus, test_service};
use printledger::application::AppError;
use printledger::domain::PageSize;
use uuid::Uuid;

#[tokio::test]
async fn test_list_logs_for_student_filters_and_handles_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let campus = Campus::create(&service).await?;
    let other = service
        .register_student("Binh Tran".into(), "2200001".into(), 50)
        .await?;

    let mut other_request = campus.request(2, 1, PageSize::A4);
    other_request.student_id = other.id;

    service
        .submit(&[
            campus.request(1, 1, PageSize::A4),
            other_request,
            campus.request(3, 1, PageSize::A4),
        ])
        .await?;

    assert_eq!(service.list_logs().await?.len(), 3);

    let mine = service.list_logs_for_student(campus.student.id).await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|l| l.student_id == campus.student.id));

    let theirs = service.list_logs_for_student(other.id).await?;
    assert_eq!(theirs.len(), 1);

    // Unknown student: empty, not an error
    let nobody = service.list_logs_for_student(Uuid::new_v4()).await?;
    assert!(nobody.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_log_missing_id_is_an_error() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let missing = Uuid::new_v4();
    let result = service.get_log(missing).await;

    match result {
        Err(AppError::PrintingLogNotFound(id)) => assert_eq!(id, missing.to_string()),
        other => panic!("expected PrintingLogNotFound, got {:?}", other.map(|l| l.id)),
    }

    Ok(())
}

#[tokio::test]
async fn test_delete_logs_ignores_unknown_ids() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let campus = Campus::create(&service).await?;

    let outcome = service
        .submit(&[
            campus.request(1, 1, PageSize::A4),
            campus.request(2, 1, PageSize::A4),
            campus.request(3, 1, PageSize::A4),
        ])
        .await?;
    let ids: Vec<Uuid> = outcome.logs.iter().map(|l| l.id).collect();

    let removed = service
        .delete_logs(&[ids[0], Uuid::new_v4(), ids[2], Uuid::new_v4()])
        .await?;
    assert_eq!(removed, 2);

    let remaining = service.list_logs().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, ids[1]);

    assert!(service.get_log(ids[0]).await.is_err());
    assert!(service.get_log(ids[1]).await.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_delete_logs_empty_or_all_unknown_is_a_no_op() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let campus = Campus::create(&service).await?;
    service
        .submit(&[campus.request(1, 1, PageSize::A4)])
        .await?;

    assert_eq!(service.delete_logs(&[]).await?, 0);
    assert_eq!(service.delete_logs(&[Uuid::new_v4()]).await?, 0);
    assert_eq!(service.list_logs().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_deleting_logs_does_not_refund_balances() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let campus = Campus::create(&service).await?;

    let outcome = service
        .submit(&[campus.request(10, 1, PageSize::A4)])
        .await?;
    service.delete_logs(&[outcome.logs[0].id]).await?;

    let (student, printer) = campus.reload(&service).await?;
    assert_eq!(student.paper_quantity, 90);
    assert_eq!(printer.stock.a4, 490);

    Ok(())
}
