use std::collections::HashSet;
use std::path::PathBuf;

use tokio_test::{assert_err, assert_ok};

use job_scraper::browser::open_driver;
use job_scraper::config::Config;
use job_scraper::infrastructure::PageDriver;
use job_scraper::logger;
use job_scraper::models::{load_search_config, Job, QuerySpec, RunResult, SearchConfig};
use job_scraper::orchestrator::{BatchRunner, RunStatus};
use job_scraper::services::ResultStore;
use job_scraper::testing::{FakeNode, FakePage};
use job_scraper::workflow::{QueryOutcome, SearchCtx, SearchFlow};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("job_scraper_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn config_in(dir: &PathBuf) -> Config {
    Config {
        output_dir: dir.to_string_lossy().to_string(),
        ..Config::instant()
    }
}

fn card(title: &str, company: &str, id: u32) -> FakeNode {
    FakeNode::job_card(
        title,
        company,
        "New York, NY",
        &format!("https://www.linkedin.com/jobs/view/{}", id),
        "2025-02-20",
    )
}

fn read_jobs(path: &PathBuf) -> Vec<Job> {
    let content = std::fs::read_to_string(path).expect("数据集应该存在");
    serde_json::from_str(&content).expect("数据集应该是合法的 JSON")
}

#[tokio::test]
async fn duplicate_link_across_experience_levels_is_saved_once() {
    let dir = scratch_dir("dedup");
    let page = FakePage::new()
        .with_results_list()
        .with_snapshot(vec![(
            ".jobs-search__results-list li",
            vec![card("Backend Engineer", "Acme", 1), card("Data Engineer", "Globex", 2)],
        )]);
    let search = SearchConfig {
        job_titles: vec!["Engineer".to_string()],
        locations: vec!["New York".to_string()],
        experience_levels: vec!["1".to_string(), "2".to_string()],
    };
    let config = Config { page_cap: 1, ..config_in(&dir) };

    let summary = BatchRunner::new(&config)
        .run(&page, &search.batches(), std::future::pending())
        .await;

    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.success, 2);
    assert_eq!(summary.saved_files.len(), 1);

    let jobs = read_jobs(&summary.saved_files[0]);
    assert_eq!(jobs.len(), 2);
    let links: HashSet<_> = jobs.iter().map(|j| j.link.as_str()).collect();
    assert_eq!(links.len(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn failed_search_does_not_stop_the_batch() {
    let dir = scratch_dir("failed");
    // 结果列表永远不出现：每个查询都会在三次尝试后失败
    let page = FakePage::new();
    let search = SearchConfig {
        job_titles: vec!["Engineer".to_string(), "Designer".to_string()],
        locations: vec!["Berlin".to_string()],
        experience_levels: vec![],
    };

    let summary = BatchRunner::new(&config_in(&dir))
        .run(&page, &search.batches(), std::future::pending())
        .await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.success, 0);
    assert_eq!(page.navigations().len(), 6);
    // 空结果也会写出数据集
    assert_eq!(summary.saved_files.len(), 2);
    assert!(read_jobs(&summary.saved_files[0]).is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn masked_and_incomplete_cards_never_reach_the_dataset() {
    let dir = scratch_dir("masked");
    let masked = FakeNode::new()
        .with("h3", FakeNode::text("**********"))
        .with("h4", FakeNode::text("********"));
    let no_company = FakeNode::new().with("h3", FakeNode::text("Mystery Role"));
    let page = FakePage::new().with_results_list().with_snapshot(vec![(
        ".job-search-card",
        vec![card("Rust Engineer", "Ferris Inc", 7), masked, no_company],
    )]);
    let config = Config { page_cap: 1, ..config_in(&dir) };
    let flow = SearchFlow::new(&config);
    let mut run = RunResult::new("Rust Engineer", "Remote");

    let outcome = flow
        .run(&page, &QuerySpec::new("Rust Engineer", "Remote", None), &SearchCtx::new(1, 1), &mut run)
        .await;
    assert!(outcome.is_success());
    // 遮罩卡片在解析阶段被丢弃，缺少公司的卡片保留到保存阶段
    assert_eq!(run.len(), 2);

    let store = ResultStore::new(&dir);
    let path = assert_ok!(store.persist(&run, chrono::Local::now()).await);
    let jobs = read_jobs(&path);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Rust Engineer");
    assert_eq!(jobs[0].company, "Ferris Inc");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn scroll_fallback_collects_every_page() {
    let dir = scratch_dir("scroll");
    let first: Vec<_> = (0..4).map(|i| card(&format!("Engineer {}", i), "Acme", i)).collect();
    let second: Vec<_> = (0..7).map(|i| card(&format!("Engineer {}", i), "Acme", i)).collect();
    let page = FakePage::new()
        .with_results_list()
        .with_snapshot(vec![(".job-search-card", first)])
        .with_snapshot(vec![(".job-search-card", second)]);
    let config = Config { page_cap: 2, ..config_in(&dir) };
    let mut run = RunResult::new("Engineer", "Austin");

    let outcome = SearchFlow::new(&config)
        .run(&page, &QuerySpec::new("Engineer", "Austin", None), &SearchCtx::new(1, 1), &mut run)
        .await;

    assert_eq!(outcome, QueryOutcome::Success { jobs: 7, attempts: 1 });
    assert_eq!(page.scroll_count(), 1);
}

#[tokio::test]
async fn prepared_output_is_stable_when_saved_again() {
    let dir = scratch_dir("stable");
    let mut run = RunResult::new("Engineer", "Austin");
    run.push(Job {
        source: "LinkedIn".to_string(),
        title: "  Senior   Engineer ".to_string(),
        company: "Acme".to_string(),
        location: "Austin,\n TX".to_string(),
        link: "https://www.linkedin.com/jobs/view/3".to_string(),
        date_posted: "2025-02-01".to_string(),
    });
    run.push(Job {
        source: "LinkedIn".to_string(),
        title: "Engineer".to_string(),
        company: "Globex".to_string(),
        location: "Austin, TX".to_string(),
        link: "https://www.linkedin.com/jobs/view/4".to_string(),
        date_posted: "2025-02-10".to_string(),
    });

    let store = ResultStore::new(&dir);
    let first = assert_ok!(store.persist(&run, chrono::Local::now()).await);
    let saved = read_jobs(&first);
    assert_eq!(saved[0].date_posted, "2025-02-10");
    assert_eq!(saved[1].title, "Senior Engineer");
    assert_eq!(saved[1].location, "Austin, TX");

    let again = dir.join("again.json");
    assert_ok!(store.write_jobs(&saved, &again).await);
    assert_eq!(
        std::fs::read_to_string(&first).unwrap_or_default(),
        std::fs::read_to_string(&again).unwrap_or_default()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn search_config_without_titles_is_rejected() {
    let dir = scratch_dir("config");
    std::fs::create_dir_all(&dir).expect("创建目录失败");
    let path = dir.join("config.json");
    std::fs::write(&path, r#"{"job_titles": [], "locations": ["Paris"]}"#).expect("写入失败");

    assert_err!(load_search_config(&path).await);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
#[ignore] // 需要本机 Chrome 和网络：cargo test -- --ignored
async fn live_linkedin_search() {
    logger::init(true);

    let dir = scratch_dir("live");
    let config = Config {
        page_cap: 1,
        job_cap: 10,
        ..Config::from_env()
    };
    let config = Config {
        output_dir: dir.to_string_lossy().to_string(),
        ..config
    };

    let driver = open_driver(&config).await.expect("启动浏览器失败");
    let mut run = RunResult::new("Software Engineer", "New York");
    let outcome = SearchFlow::new(&config)
        .run(
            &driver,
            &QuerySpec::new("Software Engineer", "New York", Some("2".to_string())),
            &SearchCtx::new(1, 1),
            &mut run,
        )
        .await;
    driver.quit().await.expect("关闭浏览器失败");

    println!("{:?}: {} 个职位", outcome, run.len());
    assert!(run.len() <= 10);
}
