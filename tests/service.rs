mod common;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use movie_review_client::{
    error::{Error, ReviewError},
    instruction::MovieReviewInstruction,
    pda::{find_review_address, find_user_vault_address},
    state::{MovieAccount, ProgramAccount},
    validation::{validate_movie, validate_review},
};

use common::*;

#[tokio::test]
async fn lists_movies_and_skips_foreign_accounts() {
    let test = TestContext::new(false);
    let interstellar = insert_movie(&test.chain, &test.program_id, "Interstellar");
    let tenet = insert_movie(&test.chain, &test.program_id, "Tenet");

    // Same discriminator, wrong owner.
    let foreign_program = Pubkey::new_unique();
    insert_movie(&test.chain, &foreign_program, "Memento");

    let movies = test.service.list_movies().await.unwrap();

    let mut addresses: Vec<Pubkey> = movies.iter().map(|m| m.public_key).collect();
    addresses.sort();
    let mut expected = vec![interstellar, tenet];
    expected.sort();
    assert_eq!(addresses, expected);
    assert!(movies.iter().any(|m| m.account.movie == "Tenet"));
}

#[tokio::test]
async fn undecodable_accounts_are_skipped() {
    let test = TestContext::new(false);
    insert_movie(&test.chain, &test.program_id, "Interstellar");

    let mut broken = MovieAccount::DISCRIMINATOR.to_vec();
    broken.extend_from_slice(&[1, 2]);
    test.chain
        .insert(Pubkey::new_unique(), program_owned(&test.program_id, broken));

    let movies = test.service.list_movies().await.unwrap();
    assert_eq!(movies.len(), 1);
}

#[tokio::test]
async fn my_reviews_filters_by_reviewer() {
    let test = TestContext::new(false);
    let movie = insert_movie(&test.chain, &test.program_id, "Interstellar");
    let me = Pubkey::new_unique();
    let someone_else = Pubkey::new_unique();
    insert_review(&test.chain, &test.program_id, &movie, &me, 9);
    insert_review(&test.chain, &test.program_id, &movie, &someone_else, 3);

    let all = test.service.list_reviews().await.unwrap();
    let mine = test.service.my_reviews(&me).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].account.reviewer, me);
    assert_eq!(mine[0].account.movie_rating, 9);
}

#[tokio::test]
async fn reviews_for_movie_filters_by_target() {
    let test = TestContext::new(false);
    let interstellar = insert_movie(&test.chain, &test.program_id, "Interstellar");
    let tenet = insert_movie(&test.chain, &test.program_id, "Tenet");
    let reviewer = Pubkey::new_unique();
    insert_review(&test.chain, &test.program_id, &interstellar, &reviewer, 9);
    insert_review(&test.chain, &test.program_id, &tenet, &reviewer, 6);

    let reviews = test.service.reviews_for_movie(&tenet).await.unwrap();

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].account.movie_address, tenet);
}

#[tokio::test]
async fn find_movie_by_name_reports_missing_movie() {
    let test = TestContext::new(false);
    insert_movie(&test.chain, &test.program_id, "Interstellar");

    let found = test.service.find_movie_by_name("Interstellar").await.unwrap();
    assert_eq!(found.account.director, "Christopher Nolan");

    let missing = test.service.find_movie_by_name("Inception").await.unwrap_err();
    assert!(matches!(missing, Error::MovieNotFound(name) if name == "Inception"));
}

#[tokio::test]
async fn reward_balance_is_zero_without_token_account() {
    let test = TestContext::new(false);
    let user = Pubkey::new_unique();

    let balance = test.service.reward_balance(&user).await.unwrap();

    assert_eq!(balance.amount, 0);
    assert_eq!(balance.ui_amount, "0");
    assert_eq!(balance.vault, find_user_vault_address(&user, &test.program_id).0);
}

#[tokio::test]
async fn reward_balance_reads_token_2022_account() {
    let test = TestContext::new(false);
    let user = Pubkey::new_unique();
    let token_account = insert_reward_balance(
        &test.chain,
        &test.program_id,
        &test.reward_mint,
        &user,
        5_000_000_000_000,
    );

    let balance = test.service.reward_balance(&user).await.unwrap();

    assert_eq!(balance.token_account, token_account);
    assert_eq!(balance.amount, 5_000_000_000_000);
    assert_eq!(balance.decimals, REWARD_DECIMALS);
    assert_eq!(balance.ui_amount, "5000");
}

#[tokio::test]
async fn create_movie_rejects_existing_name() {
    let test = TestContext::new(false);
    insert_movie(&test.chain, &test.program_id, "Interstellar");
    let admin = Pubkey::new_unique();

    let form = validate_movie("Interstellar", "Nolan", "Cooper", 2014).unwrap();
    let error = test
        .service
        .create_movie_transaction(&admin, &form)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::MovieExists(_)));

    let form = validate_movie("Inception", "Nolan", "Cobb", 2010).unwrap();
    let transaction = test
        .service
        .create_movie_transaction(&admin, &form)
        .await
        .unwrap();
    assert_eq!(transaction.message.account_keys[0], admin);
    assert_eq!(transaction.message.recent_blockhash, test.chain.blockhash);
}

#[tokio::test]
async fn create_review_requires_existing_movie() {
    let test = TestContext::new(false);
    let user = Pubkey::new_unique();
    let form = validate_review(8, "Great", "Amelia").unwrap();

    let error = test
        .service
        .create_review_transaction(&user, &Pubkey::new_unique(), &form)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::MovieNotFound(_)));
}

#[tokio::test]
async fn create_review_by_name_targets_review_pda() {
    let test = TestContext::new(true);
    let movie = insert_movie(&test.chain, &test.program_id, "Interstellar");
    let user = Pubkey::new_unique();
    let form = validate_review(10, "Stay", "Murph").unwrap();

    let transaction = test
        .service
        .create_review_for_movie_name(&user, "Interstellar", &form)
        .await
        .unwrap();

    let (review, _) = find_review_address(&movie, &user, &test.program_id);
    let keys = &transaction.message.account_keys;
    assert_eq!(keys[0], user);
    assert!(keys.contains(&review));
    assert!(keys.contains(&test.reward_mint));

    let compiled = &transaction.message.instructions[0];
    assert_eq!(
        MovieReviewInstruction::unpack(&compiled.data).unwrap(),
        MovieReviewInstruction::CreateReview {
            movie_rating: 10,
            review_comment: String::from("Stay"),
            reviewer_name: String::from("Murph"),
        }
    );
    assert!(transaction.signatures.iter().all(|s| *s == Default::default()));
}

#[tokio::test]
async fn update_and_delete_require_own_review() {
    let test = TestContext::new(false);
    let movie = insert_movie(&test.chain, &test.program_id, "Interstellar");
    let author = Pubkey::new_unique();
    let stranger = Pubkey::new_unique();
    insert_review(&test.chain, &test.program_id, &movie, &author, 7);
    let form = validate_review(8, "Better on rewatch", "Tom").unwrap();

    let error = test
        .service
        .update_review_transaction(&stranger, &movie, &form)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::ReviewNotFound { .. }));

    let error = test
        .service
        .delete_review_transaction(&stranger, &movie)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::ReviewNotFound { .. }));

    assert!(test
        .service
        .update_review_transaction(&author, &movie, &form)
        .await
        .is_ok());
    assert!(test
        .service
        .delete_review_transaction(&author, &movie)
        .await
        .is_ok());
}

#[tokio::test]
async fn submit_signs_with_local_keypair() {
    let test = TestContext::new(false);
    insert_movie(&test.chain, &test.program_id, "Interstellar");
    let signer = Keypair::new();
    let form = validate_review(9, "Do not go gentle", "Brand").unwrap();

    let transaction = test
        .service
        .create_review_for_movie_name(&signer.pubkey(), "Interstellar", &form)
        .await
        .unwrap();
    let signature = test.service.submit(transaction, &signer).await.unwrap();

    let sent = test.chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].signatures[0], signature);
    assert!(sent[0].verify().is_ok());
}

#[tokio::test]
async fn program_rejections_surface_verbatim() {
    let test = TestContext::new(false);
    let signer = Keypair::new();
    *test.chain.reject_with.lock().unwrap() = Some(ReviewError::InvalidUserToCreateMovie);

    let form = validate_movie("Interstellar", "Nolan", "Cooper", 2014).unwrap();
    let transaction = test
        .service
        .create_movie_transaction(&signer.pubkey(), &form)
        .await
        .unwrap();
    let error = test.service.submit(transaction, &signer).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Invalid user to create movie, only admin can create movie"
    );
}

#[tokio::test]
async fn program_account_info() {
    let test = TestContext::new(false);

    let missing = test.service.program_account().await.unwrap_err();
    assert!(matches!(missing, Error::ProgramNotFound(_)));

    let loader = Pubkey::new_unique();
    test.chain.insert(
        test.program_id,
        solana_sdk::account::Account {
            lamports: 1_141_440,
            data: vec![2, 0, 0, 0],
            owner: loader,
            executable: true,
            rent_epoch: 0,
        },
    );

    let info = test.service.program_account().await.unwrap();
    assert!(info.executable);
    assert_eq!(info.owner, loader);
    assert_eq!(info.data_len, 4);
}
